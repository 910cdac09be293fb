use super::fields::split_fields;
use super::{Tool, ToolParser};
use tracing::debug;

/// Mean of the `cpu MHz : <value>` lines in `/proc/cpuinfo`, one per logical core.
pub struct CpuInfoParser;

impl ToolParser for CpuInfoParser {
    type Output = Option<f64>;

    fn tool(&self) -> Tool {
        Tool::CpuInfo
    }

    fn parse(&self, text: &str) -> Option<f64> {
        let readings = split_fields(text).into_iter().filter_map(|fields| {
            if fields.first() != Some(&"cpu") || fields.get(1) != Some(&"MHz") {
                return None;
            }
            // fields[2] is the ':' separator.
            let value = fields.get(3).and_then(|v| v.parse::<f64>().ok());
            Some(value.unwrap_or_else(|| {
                debug!(line = ?fields, "unreadable cpu MHz line, counting it as zero");
                0.0
            }))
        });
        mean(readings)
    }
}

/// Busy percentage from `vmstat 1 1`: `100 - id`.
pub struct VmstatParser;

impl VmstatParser {
    /// Line 0 is the column group banner, line 1 the column names.
    const HEADER_LINE: usize = 1;
    const DATA_LINE: usize = 2;
    const IDLE_COLUMN: &'static str = "id";
}

impl ToolParser for VmstatParser {
    type Output = u8;

    fn tool(&self) -> Tool {
        Tool::Vmstat
    }

    fn parse(&self, text: &str) -> u8 {
        let lines = split_fields(text);
        let idle = lines
            .get(Self::HEADER_LINE)
            .and_then(|header| header.iter().position(|t| *t == Self::IDLE_COLUMN))
            .and_then(|column| lines.get(Self::DATA_LINE)?.get(column))
            .and_then(|value| value.parse::<u8>().ok());

        match idle {
            Some(idle) => 100 - idle.min(100),
            None => {
                debug!("no idle column in vmstat output, reporting zero load");
                0
            }
        }
    }
}

/// Mean of the per-core `Core N: +45.0°C ...` readings printed by `sensors`.
pub struct SensorsParser;

impl ToolParser for SensorsParser {
    type Output = Option<f64>;

    fn tool(&self) -> Tool {
        Tool::Sensors
    }

    fn parse(&self, text: &str) -> Option<f64> {
        let readings = split_fields(text).into_iter().filter_map(|fields| {
            if fields.first() != Some(&"Core") {
                return None;
            }
            let value = fields.get(2).and_then(|v| parse_celsius(v));
            Some(value.unwrap_or_else(|| {
                debug!(line = ?fields, "unreadable core temperature, counting it as zero");
                0.0
            }))
        });
        mean(readings)
    }
}

/// `+45.0°C` -> `45.0`. Drops the leading `+` and whatever unit suffix follows
/// the last digit, so `°F` readings or a mangled degree sign still parse. The
/// number is taken as printed; no unit conversion happens here.
fn parse_celsius(token: &str) -> Option<f64> {
    let token = token.strip_prefix('+').unwrap_or(token);
    token
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse::<f64>()
        .ok()
}

/// `None` when there are no values.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(sum / f64::from(count))
}
