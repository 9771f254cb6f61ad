use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use board_logging::{board_info, board_warn};
use jobboard_core::{BoardSettings, RefreshSchedule};
use jobboard_engine::{system_clock, EngineConfig, FeedSource, FetchSettings, TriggerSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "jobboard.ron";
pub const TOKEN_ENV_VAR: &str = "JOBBOARD_TRIGGER_TOKEN";
const DEFAULT_FEED_URL: &str = "http://127.0.0.1:8000/jobs.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
        }
    }
}

impl FetchConfig {
    pub fn to_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        }
    }
}

/// Everything `jobboard.ron` can set. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedSource,
    pub fetch: FetchConfig,
    pub board: BoardSettings,
    pub trigger: Option<TriggerSettings>,
    pub refresh_schedule: RefreshSchedule,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedSource::json_document(DEFAULT_FEED_URL),
            fetch: FetchConfig::default(),
            board: BoardSettings::default(),
            trigger: None,
            refresh_schedule: RefreshSchedule::default(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Reads the config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                board_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Installs the trigger token. A blank value is ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        let token = token.filter(|value| !value.trim().is_empty());
        match (&mut self.trigger, token) {
            (Some(trigger), Some(token)) => trigger.token = Some(token),
            (None, Some(_)) => {
                board_warn!("{} is set but no trigger endpoint is configured", TOKEN_ENV_VAR)
            }
            _ => {}
        }
        self
    }

    pub fn with_env_token(self) -> Self {
        self.with_token(std::env::var(TOKEN_ENV_VAR).ok())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: self.fetch.to_settings(),
            source: self.feed.clone(),
            trigger: self.trigger.clone(),
            schedule: self.refresh_schedule.clone(),
            clock: system_clock(),
        }
    }
}
