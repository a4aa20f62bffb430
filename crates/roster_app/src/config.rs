use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use roster_core::{CoreConfig, PollFailurePolicy, RefreshPolicy};
use roster_engine::{ClientSettings, DEFAULT_BASE_URL};
use roster_logging::roster_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "roster_import.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefreshMode {
    #[default]
    EveryChange,
    TerminalOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollFailureConfig {
    pub warn_after: Option<u32>,
    pub fail_after: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub refresh_policy: RefreshMode,
    pub poll_failures: PollFailureConfig,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: millis(client.poll_interval),
            connect_timeout_ms: millis(client.connect_timeout),
            request_timeout_ms: millis(client.request_timeout),
            refresh_policy: RefreshMode::default(),
            poll_failures: PollFailureConfig::default(),
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn core_config(&self) -> CoreConfig {
        CoreConfig {
            refresh_policy: match self.refresh_policy {
                RefreshMode::EveryChange => RefreshPolicy::EveryChange,
                RefreshMode::TerminalOnly => RefreshPolicy::TerminalOnly,
            },
            poll_failures: PollFailurePolicy {
                warn_after: self.poll_failures.warn_after,
                fail_after: self.poll_failures.fail_after,
            },
        }
    }
}

/// Loads the config file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    roster_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
