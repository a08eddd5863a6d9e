use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use slip_core::StalePolicy;
use slip_engine::{ShortenSettings, DEFAULT_ENDPOINT};
use slip_logging::{slip_info, slip_warn};
use thiserror::Error;

use crate::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "slip.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Runtime settings, read from a RON file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Origin share links are built on.
    pub origin: String,
    /// Directory holding the stored local record.
    pub storage_dir: PathBuf,
    pub shortener_endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Drop short links that arrive for a superseded request or an edited record.
    pub discard_stale_links: bool,
    pub log_level: String,
    /// `File` keeps the terminal free for the form; `Terminal` or `Both` also print logs.
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: "https://uplatimi.online".to_string(),
            storage_dir: PathBuf::from(".uplatimi"),
            shortener_endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            discard_stale_links: false,
            log_level: "info".to_string(),
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Read `path`, falling back to defaults when it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => {
                slip_info!("Loaded config from {:?}", path);
                config
            }
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                slip_warn!("Using default config; {:?} is unusable: {}", path, err);
                Self::default()
            }
        }
    }

    pub fn shorten_settings(&self) -> ShortenSettings {
        ShortenSettings {
            endpoint: self.shortener_endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn stale_policy(&self) -> StalePolicy {
        if self.discard_stale_links {
            StalePolicy::Discard
        } else {
            StalePolicy::Apply
        }
    }
}
