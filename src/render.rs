use crate::state::Report;
use std::time::SystemTime;

const SEPARATOR: &str = " | ";

/// `CPU: 2.5 GHz 70% 50°C | RAM: 60% | Swap: 5% | ↑0.3 Mb/s ↓1.2 Mb/s`
///
/// Unknown frequency or temperature renders as zero; the swap segment is only
/// present when swap is configured.
pub fn status_line(report: &Report) -> String {
    let mut segments = vec![
        format!(
            "CPU: {} {}% {:.0}°C",
            format_frequency(report.cpu_freq_mhz.unwrap_or(0.0)),
            report.cpu_load_percent,
            report.cpu_temp_celsius.unwrap_or(0.0)
        ),
        format!("RAM: {:.0}%", report.memory.mem_used_percent),
    ];
    if let Some(swap) = report.memory.swap_used_percent {
        segments.push(format!("Swap: {swap:.0}%"));
    }
    segments.push(format!(
        "↑{:.1} Mb/s ↓{:.1} Mb/s",
        report.throughput.tx_mbps, report.throughput.rx_mbps
    ));
    segments.join(SEPARATOR)
}

pub fn format_frequency(mhz: f64) -> String {
    if mhz >= 1000.0 {
        format!("{:.1} GHz", mhz / 1000.0)
    } else {
        format!("{mhz:.0} MHz")
    }
}

#[derive(serde::Serialize)]
struct TimedReport<'a> {
    sampled_at: String,
    #[serde(flatten)]
    report: &'a Report,
}

/// The report as a single JSON line, stamped with an RFC 3339 time.
pub fn json_line(report: &Report, sampled_at: SystemTime) -> Result<String, serde_json::Error> {
    serde_json::to_string(&TimedReport {
        sampled_at: humantime::format_rfc3339_seconds(sampled_at).to_string(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{MemoryUsage, Throughput};
    use std::time::{Duration, UNIX_EPOCH};

    fn report() -> Report {
        Report {
            cpu_freq_mhz: Some(2500.0),
            cpu_load_percent: 70,
            cpu_temp_celsius: Some(50.0),
            memory: MemoryUsage {
                mem_used_percent: 60.0,
                swap_used_percent: None,
            },
            throughput: Throughput {
                rx_mbps: 1.2,
                tx_mbps: 0.3,
            },
        }
    }

    #[test]
    fn frequency_switches_unit_at_one_ghz() {
        assert_eq!(format_frequency(1500.0), "1.5 GHz");
        assert_eq!(format_frequency(1000.0), "1.0 GHz");
        assert_eq!(format_frequency(800.0), "800 MHz");
        assert_eq!(format_frequency(999.4), "999 MHz");
    }

    #[test]
    fn line_without_swap() {
        assert_eq!(
            status_line(&report()),
            "CPU: 2.5 GHz 70% 50°C | RAM: 60% | ↑0.3 Mb/s ↓1.2 Mb/s"
        );
    }

    #[test]
    fn line_with_swap_and_rounding() {
        let mut r = report();
        r.cpu_temp_celsius = Some(44.25);
        r.memory = MemoryUsage {
            mem_used_percent: 39.27,
            swap_used_percent: Some(12.8),
        };
        r.throughput = Throughput {
            rx_mbps: 10.04,
            tx_mbps: 0.0,
        };
        assert_eq!(
            status_line(&r),
            "CPU: 2.5 GHz 70% 44°C | RAM: 39% | Swap: 13% | ↑0.0 Mb/s ↓10.0 Mb/s"
        );
    }

    #[test]
    fn json_line_carries_timestamp_and_nulls() {
        let mut r = report();
        r.cpu_temp_celsius = None;
        let line = json_line(&r, UNIX_EPOCH + Duration::from_secs(1_700_000_000))
            .expect("report serialises");
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");

        assert_eq!(value["sampled_at"], "2023-11-14T22:13:20Z");
        assert_eq!(value["cpu_load_percent"], 70);
        assert!(value["cpu_temp_celsius"].is_null());
        assert!(value["memory"]["swap_used_percent"].is_null());
        assert_eq!(value["throughput"]["rx_mbps"], 1.2);
        assert!(!line.contains('\n'));
    }
}
