/*
[INPUT]:  Optional YAML file, TASKDECK_* environment variables
[OUTPUT]: Parsed application configuration
[POS]:    Configuration layer - gateway, execution and logging settings
[UPDATE]: When adding new configuration options
*/

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskdeck_adapter::{ClientConfig, DEFAULT_BASE_URL};

/// Top-level configuration for the task client
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend connection settings
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Upper bound for a single execute round trip; unset waits indefinitely
    #[serde(default)]
    pub execute_timeout_secs: Option<u64>,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LogConfig {
    /// EnvFilter directive, e.g. "warn" or "taskdeck_sync=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily-rolling log files; stderr only when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// `<config dir>/taskdeck/config.yaml`, read when present and no path is given
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskdeck").join("config.yaml"))
}

impl AppConfig {
    /// Layer: defaults, YAML file, then `TASKDECK_*` environment
    /// (`__` separates nested keys, e.g. `TASKDECK_GATEWAY__BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder =
                        builder.add_source(File::from(path).format(FileFormat::Yaml).required(false));
                }
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("TASKDECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().context("read configuration sources")?;
        settings
            .try_deserialize()
            .context("deserialize configuration")
    }

    /// Parse a YAML document on its own, without environment overrides
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.gateway.base_url.clone(),
            connect_timeout: Duration::from_secs(self.gateway.connect_timeout_secs),
            request_timeout: self.gateway.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn execute_timeout(&self) -> Option<Duration> {
        self.execute_timeout_secs.map(Duration::from_secs)
    }
}
