use tracing::debug;

/// Cumulative traffic across all non-loopback interfaces at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct NetSample {
    pub sampled_at_secs: f64,
    pub rx_total_mb: f64,
    pub tx_total_mb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Throughput {
    pub rx_mbps: f64,
    pub tx_mbps: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct MemoryUsage {
    pub mem_used_percent: f64,
    /// `None` when no swap is configured.
    pub swap_used_percent: Option<f64>,
}

/// Everything measured during one run. `None` means the source reported no data.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct Report {
    pub cpu_freq_mhz: Option<f64>,
    pub cpu_load_percent: u8,
    pub cpu_temp_celsius: Option<f64>,
    pub memory: MemoryUsage,
    pub throughput: Throughput,
}

impl Throughput {
    /// Rate between two cumulative samples, in Mb/s.
    pub fn between(start: &NetSample, stop: &NetSample) -> Self {
        let elapsed = stop.sampled_at_secs - start.sampled_at_secs;
        if elapsed <= 0.0 {
            return Self::default();
        }
        Self {
            rx_mbps: rate(start.rx_total_mb, stop.rx_total_mb, elapsed),
            tx_mbps: rate(start.tx_total_mb, stop.tx_total_mb, elapsed),
        }
    }
}

fn rate(before: f64, after: f64, elapsed: f64) -> f64 {
    let delta = after - before;
    if delta < 0.0 {
        debug!(before, after, "counter went backwards, reporting zero");
        return 0.0;
    }
    delta / elapsed
}
