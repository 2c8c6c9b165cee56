//! Immutable run configuration.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::alias::LinkMode;
use crate::download::{CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY};
use crate::slack::{ApiToken, DEFAULT_LISTING_ENDPOINT};

/// Directory used when none is given.
pub const DEFAULT_TARGET_DIR: &str = "emoji";

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API token is empty.
    #[error("API token must not be empty")]
    EmptyToken,

    /// The target directory path is empty.
    #[error("target directory must not be empty")]
    EmptyTargetDir,
}

/// Everything a backup run needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Slack API token (redacted in `Debug`).
    pub api_token: ApiToken,
    /// Directory images and aliases are written into.
    pub target_dir: PathBuf,
    /// Download worker count.
    pub concurrency: usize,
    /// How alias files are created.
    pub link_mode: LinkMode,
    /// Listing endpoint URL (without the token).
    pub listing_endpoint: String,
    /// Connect timeout for every request; `None` waits indefinitely.
    pub connect_timeout: Option<Duration>,
}

impl BackupConfig {
    /// Creates a configuration with default settings.
    pub fn new(api_token: ApiToken, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_token,
            target_dir: target_dir.into(),
            concurrency: DEFAULT_CONCURRENCY,
            link_mode: LinkMode::default(),
            listing_endpoint: DEFAULT_LISTING_ENDPOINT.to_string(),
            connect_timeout: Some(Duration::from_secs(CONNECT_TIMEOUT_SECS)),
        }
    }

    /// Sets the download worker count.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the alias link mode.
    #[must_use]
    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    /// Overrides the listing endpoint.
    #[must_use]
    pub fn with_listing_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.listing_endpoint = endpoint.into();
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Checks values that cannot be validated by type alone.
    ///
    /// Concurrency bounds are enforced by the download engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty token or target directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        if self.target_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyTargetDir);
        }
        Ok(())
    }
}
