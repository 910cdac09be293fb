mod collectors;
mod config;
mod render;
mod state;

use clap::Parser;
use collectors::runner::SystemRunner;
use collectors::{MonotonicClock, Sampler};
use config::Config;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Prints a one-line CPU, memory and network summary for status bars.
#[derive(Parser, Debug)]
#[command(name = "statline")]
#[command(version)]
struct Cli {
    /// Optional YAML file overriding tool commands and paths.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    print_default_config: bool,
    /// Print the report as JSON instead of the status line.
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", Config::example_yaml());
        return;
    }

    let cfg = match &cli.config {
        Some(path) => match Config::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                error!(error = %err, "failed to load configuration");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let sampler = Sampler::new(
        SystemRunner::new(&cfg),
        MonotonicClock::start(),
        cfg.loopback_flag.as_str(),
    );
    let report = sampler.run().await;
    debug!(?report, "sampling finished");

    if cli.json {
        match render::json_line(&report, SystemTime::now()) {
            Ok(line) => {
                println!("{line}");
                return;
            }
            Err(err) => error!(error = %err, "failed to serialise report, printing status line"),
        }
    }
    println!("{}", render::status_line(&report));
}

/// Logs go to stderr; stdout carries only the report.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
