pub mod cpu;
pub mod fields;
pub mod memory;
pub mod network;
pub mod runner;

use crate::state::{NetSample, Report, Throughput};
use cpu::{CpuInfoParser, SensorsParser, VmstatParser};
use memory::FreeParser;
use network::IpLinkParser;
use runner::SampleError;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// External sources whose text output is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    IpLink,
    CpuInfo,
    Vmstat,
    Sensors,
    Free,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tool::IpLink => "ip-link",
            Tool::CpuInfo => "cpuinfo",
            Tool::Vmstat => "vmstat",
            Tool::Sensors => "sensors",
            Tool::Free => "free",
        };
        f.write_str(name)
    }
}

/// Turns one tool's raw output into a typed value. Parsers never fail: anything
/// they cannot make sense of degrades to zero or `None`.
pub trait ToolParser {
    type Output;

    fn tool(&self) -> Tool;
    fn parse(&self, text: &str) -> Self::Output;
}

pub trait ToolRunner {
    async fn capture(&self, tool: Tool) -> Result<String, SampleError>;
}

/// Monotonic seconds, used to timestamp network samples.
pub trait Clock {
    fn now_secs(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

pub struct Sampler<R, C> {
    runner: R,
    clock: C,
    loopback_flag: String,
}

impl<R: ToolRunner, C: Clock> Sampler<R, C> {
    pub fn new(runner: R, clock: C, loopback_flag: impl Into<String>) -> Self {
        Self {
            runner,
            clock,
            loopback_flag: loopback_flag.into(),
        }
    }

    /// Runs every sampler once. The two network samples bracket the rest so the
    /// throughput window covers the whole run, including the blocking vmstat call.
    pub async fn run(&self) -> Report {
        let start = self.sample_network().await;

        let cpu_load_percent = self.sample(&VmstatParser).await;
        let cpu_freq_mhz = self.sample(&CpuInfoParser).await;
        let cpu_temp_celsius = self.sample(&SensorsParser).await;
        let memory = self.sample(&FreeParser).await;

        let stop = self.sample_network().await;
        let window = stop.sampled_at_secs - start.sampled_at_secs;
        if let Ok(window) = Duration::try_from_secs_f64(window) {
            debug!(window = %humantime::format_duration(window), "network window closed");
        }

        Report {
            cpu_freq_mhz,
            cpu_load_percent,
            cpu_temp_celsius,
            memory,
            throughput: Throughput::between(&start, &stop),
        }
    }

    async fn sample_network(&self) -> NetSample {
        let sampled_at_secs = self.clock.now_secs();
        let counters = self.sample(&IpLinkParser::new(&self.loopback_flag)).await;
        NetSample {
            sampled_at_secs,
            rx_total_mb: network::bytes_to_megabits(counters.rx_bytes),
            tx_total_mb: network::bytes_to_megabits(counters.tx_bytes),
        }
    }

    async fn sample<P: ToolParser>(&self, parser: &P) -> P::Output {
        let tool = parser.tool();
        let text = match self.runner.capture(tool).await {
            Ok(text) => text,
            Err(err) => {
                debug!(%tool, error = %err, "capture failed, parsing empty output");
                String::new()
            }
        };
        parser.parse(&text)
    }
}
