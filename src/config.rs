//! Exporter configuration.
//!
//! Settings come from an optional TOML file and the command line; flags
//! given on the command line win over the file.
//!
//! ```toml
//! listen_address = "0.0.0.0:9104"
//! telemetry_path = "/metrics"
//! silent = false
//! ```

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "rsyslog-exporter", version, about)]
pub struct Cli {
    /// Address to listen on for web interface and telemetry.
    #[arg(long = "web.listen-address", value_name = "ADDR")]
    pub listen_address: Option<SocketAddr>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", value_name = "PATH")]
    pub telemetry_path: Option<String>,

    /// Disable logging of errors in handling stats lines.
    #[arg(long)]
    pub silent: bool,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolves the effective configuration.
    pub fn into_config(self) -> Result<ExporterConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };

        if let Some(addr) = self.listen_address {
            config.listen_address = addr;
        }
        if let Some(path) = self.telemetry_path {
            config.telemetry_path = path;
        }
        // A bare flag can only switch silence on.
        config.silent |= self.silent;

        config.validate()?;
        Ok(config)
    }
}

/// Effective exporter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExporterConfig {
    /// Address of the HTTP listener.
    pub listen_address: SocketAddr,
    /// Path serving the metrics.
    pub telemetry_path: String,
    /// Suppress per-line diagnostics for dropped records.
    pub silent: bool,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: ([0, 0, 0, 0], 9104).into(),
            telemetry_path: "/metrics".to_string(),
            silent: false,
        }
    }
}

impl ExporterConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: ExporterConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    ///
    /// `/` serves the landing page, so the telemetry path must be a
    /// different absolute path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.telemetry_path.starts_with('/') || self.telemetry_path == "/" {
            return Err(ConfigError::InvalidTelemetryPath(
                self.telemetry_path.clone(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid telemetry path {0:?} (must start with '/' and not be '/')")]
    InvalidTelemetryPath(String),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}
