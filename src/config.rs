use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_cpuinfo_path")]
    pub cpuinfo_path: String,
    #[serde(default = "default_loopback_flag")]
    pub loopback_flag: String,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_ip")]
    pub ip: ToolCommand,
    #[serde(default = "default_vmstat")]
    pub vmstat: ToolCommand,
    #[serde(default = "default_free")]
    pub free: ToolCommand,
    #[serde(default = "default_sensors")]
    pub sensors: ToolCommand,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cpuinfo_path: default_cpuinfo_path(),
            loopback_flag: default_loopback_flag(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            vmstat: default_vmstat(),
            free: default_free(),
            sensors: default_sensors(),
        }
    }
}

impl ToolCommand {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_display.clone(),
            source,
        })?;

        let cfg: Config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path_display,
            source,
        })?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cpuinfo_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cpuinfo_path must not be empty".to_string(),
            ));
        }
        // Matched against the first entry of the `<...>` flag list, so a comma can never match.
        if self.loopback_flag.trim().is_empty() || self.loopback_flag.contains(',') {
            return Err(ConfigError::Validation(
                "loopback_flag must be a single non-empty interface flag".to_string(),
            ));
        }

        validate_tool("ip", &self.tools.ip)?;
        validate_tool("vmstat", &self.tools.vmstat)?;
        validate_tool("free", &self.tools.free)?;
        validate_tool("sensors", &self.tools.sensors)?;

        Ok(())
    }

    pub fn example_yaml() -> &'static str {
        include_str!("../config.yaml.example")
    }
}

fn validate_tool(name: &str, cmd: &ToolCommand) -> Result<(), ConfigError> {
    if cmd.program.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "tools.{name}.program must not be empty"
        )));
    }
    Ok(())
}

fn default_cpuinfo_path() -> String {
    "/proc/cpuinfo".to_string()
}

fn default_loopback_flag() -> String {
    "LOOPBACK".to_string()
}

fn default_ip() -> ToolCommand {
    ToolCommand::new("ip", &["-s", "link"])
}

fn default_vmstat() -> ToolCommand {
    ToolCommand::new("vmstat", &["1", "1"])
}

fn default_free() -> ToolCommand {
    ToolCommand::new("free", &["-m"])
}

fn default_sensors() -> ToolCommand {
    ToolCommand::new("sensors", &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_yaml_matches_defaults() {
        let cfg: Config = serde_yaml::from_str(Config::example_yaml()).expect("example parses");
        cfg.validate().expect("example is valid");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg: Config = serde_yaml::from_str(
            "tools:\n  sensors:\n    program: /usr/local/bin/sensors\n    args: [\"-A\"]\n",
        )
        .expect("partial config parses");
        assert_eq!(cfg.tools.sensors.program, "/usr/local/bin/sensors");
        assert_eq!(cfg.tools.sensors.args, vec!["-A".to_string()]);
        assert_eq!(cfg.tools.ip, default_ip());
        assert_eq!(cfg.cpuinfo_path, "/proc/cpuinfo");
    }

    #[test]
    fn rejects_empty_program() {
        let mut cfg = Config::default();
        cfg.tools.free.program = "  ".to_string();
        let err = cfg.validate().expect_err("empty program must be rejected");
        assert!(err.to_string().contains("tools.free.program"));
    }

    #[test]
    fn rejects_compound_loopback_flag() {
        let mut cfg = Config::default();
        cfg.loopback_flag = "LOOPBACK,UP".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Config::load_from_file("/nonexistent/statline.yaml")
            .expect_err("missing file must fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
