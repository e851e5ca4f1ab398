//! TOML configuration for the daemon
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working local-mode setup. Environment variables override the file.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use opsboard_core::{is_log_source, is_plain_file_name, LOG_SUFFIX};
use serde::Deserialize;

/// Log source selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Read `.log` files from a local directory
    #[default]
    Local,
    /// Serve canned in-memory logs
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Mode::Local),
            "mock" => Ok(Mode::Mock),
            other => anyhow::bail!("Unknown mode '{}', expected 'local' or 'mock'", other),
        }
    }
}

/// Console log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    #[serde(default)]
    pub mode: Mode,
    /// Log directory; falls back to `$HOME/.openclaw/logs`
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// File holding the gateway watchdog output
    #[serde(default = "default_gateway_source")]
    pub gateway_source: String,
    /// Per-file read timeout
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            directory: None,
            gateway_source: default_gateway_source(),
            read_timeout_ms: default_read_timeout_ms(),
            log_format: LogFormat::default(),
        }
    }
}

impl LogsConfig {
    /// Configured directory, or the fixed per-user default
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_else(|| default_directory(std::env::var_os("HOME").map(PathBuf::from)))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Top-level daemon configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file '{}'", path))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `OPSBOARD_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("OPSBOARD_LOGS_DIR").filter(|v| !v.is_empty()) {
            self.logs.directory = Some(PathBuf::from(dir));
        }
        if let Some(mode) = lookup("OPSBOARD_MODE") {
            self.logs.mode = mode.parse()?;
        }
        if let Some(port) = lookup("OPSBOARD_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid OPSBOARD_PORT '{}'", port))?;
        }
        if let Some(host) = lookup("OPSBOARD_HOST").filter(|v| !v.is_empty()) {
            self.server.host = host;
        }
        Ok(())
    }

    /// Reject settings that could never match a log source
    pub fn validate(&self) -> anyhow::Result<()> {
        let gateway = &self.logs.gateway_source;
        if !is_plain_file_name(gateway) || !is_log_source(gateway) {
            anyhow::bail!(
                "gateway_source '{}' must be a plain file name ending in '{}'",
                gateway,
                LOG_SUFFIX
            );
        }
        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_gateway_source() -> String {
    opsboard_fleet::DEFAULT_GATEWAY_SOURCE.to_string()
}

fn default_read_timeout_ms() -> u64 {
    opsboard_sources::DEFAULT_READ_TIMEOUT.as_millis() as u64
}

fn default_directory(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(".openclaw").join("logs"),
        None => PathBuf::from("./logs"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DaemonConfig::parse("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logs.mode, Mode::Local);
        assert_eq!(config.logs.gateway_source, "gateway-cleaner.log");
        assert_eq!(config.logs.read_timeout(), Duration::from_secs(2));
        assert_eq!(config.logs.log_format, LogFormat::Text);
        assert!(config.logs.directory.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = DaemonConfig::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8088

            [logs]
            mode = "mock"
            directory = "/srv/agent/logs"
            gateway_source = "watchdog.log"
            read_timeout_ms = 500
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.logs.mode, Mode::Mock);
        assert_eq!(
            config.logs.resolved_directory(),
            PathBuf::from("/srv/agent/logs")
        );
        assert_eq!(config.logs.gateway_source, "watchdog.log");
        assert_eq!(config.logs.read_timeout(), Duration::from_millis(500));
        assert_eq!(config.logs.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(DaemonConfig::parse("[logs]\nmode = \"cloud\"\n").is_err());
        assert!("cloud".parse::<Mode>().is_err());
        assert_eq!("MOCK".parse::<Mode>().unwrap(), Mode::Mock);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPSBOARD_LOGS_DIR", "/tmp/agent-logs"),
            ("OPSBOARD_MODE", "mock"),
            ("OPSBOARD_PORT", "9100"),
            ("OPSBOARD_HOST", "127.0.0.1"),
        ]
        .into_iter()
        .collect();

        let mut config = DaemonConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(
            config.logs.resolved_directory(),
            PathBuf::from("/tmp/agent-logs")
        );
        assert_eq!(config.logs.mode, Mode::Mock);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = DaemonConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "OPSBOARD_PORT").then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    #[serial_test::serial]
    fn test_process_env_overrides() {
        std::env::set_var("OPSBOARD_MODE", "mock");
        std::env::set_var("OPSBOARD_PORT", "18300");

        let mut config = DaemonConfig::default();
        let result = config.apply_env_overrides();

        std::env::remove_var("OPSBOARD_MODE");
        std::env::remove_var("OPSBOARD_PORT");

        result.unwrap();
        assert_eq!(config.logs.mode, Mode::Mock);
        assert_eq!(config.server.port, 18300);
    }

    #[test]
    fn test_gateway_source_must_be_log_file() {
        assert!(DaemonConfig::default().validate().is_ok());

        for bad in ["watchdog.txt", "gateway", "../gateway-cleaner.log", ""] {
            let mut config = DaemonConfig::default();
            config.logs.gateway_source = bad.to_string();
            assert!(config.validate().is_err(), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_default_directory() {
        assert_eq!(
            default_directory(Some(PathBuf::from("/home/ops"))),
            PathBuf::from("/home/ops/.openclaw/logs")
        );
        assert_eq!(default_directory(None), PathBuf::from("./logs"));
    }
}
