use super::{Tool, ToolRunner};
use crate::config::{Config, ToolCommand};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: Tool,
        source: std::io::Error,
    },
    #[error("{tool} exited with {status} and printed nothing")]
    Exit { tool: Tool, status: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Captures real tool output as configured: a subprocess per tool, except
/// cpuinfo which is read straight from its pseudo-file.
pub struct SystemRunner<'a> {
    cfg: &'a Config,
}

impl<'a> SystemRunner<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    fn command_for(&self, tool: Tool) -> Option<&'a ToolCommand> {
        let cfg: &'a Config = self.cfg;
        let tools = &cfg.tools;
        match tool {
            Tool::IpLink => Some(&tools.ip),
            Tool::Vmstat => Some(&tools.vmstat),
            Tool::Free => Some(&tools.free),
            Tool::Sensors => Some(&tools.sensors),
            Tool::CpuInfo => None,
        }
    }
}

impl ToolRunner for SystemRunner<'_> {
    async fn capture(&self, tool: Tool) -> Result<String, SampleError> {
        match self.command_for(tool) {
            Some(cmd) => run_command(tool, cmd).await,
            None => read_pseudo_file(&self.cfg.cpuinfo_path).await,
        }
    }
}

async fn run_command(tool: Tool, cmd: &ToolCommand) -> Result<String, SampleError> {
    trace!(%tool, program = %cmd.program, args = ?cmd.args, "running tool");
    let output = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|source| SampleError::Spawn { tool, source })?;

    // Partial output from a failing tool (e.g. sensors with one broken chip) is still used.
    if !output.status.success() {
        if output.stdout.is_empty() {
            return Err(SampleError::Exit {
                tool,
                status: output.status.to_string(),
            });
        }
        debug!(%tool, status = %output.status, "tool exited unsuccessfully, using its output");
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn read_pseudo_file(path: &str) -> Result<String, SampleError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SampleError::Read {
            path: path.to_string(),
            source,
        })
}
