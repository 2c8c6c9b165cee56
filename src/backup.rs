//! Backup orchestration: listing, downloads, then aliases.
//!
//! The three phases run strictly in order. Only the listing phase (and
//! creating the target directory) can fail the run; download and alias
//! failures are isolated per emoji and show up in the [`BackupReport`].

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::alias::{AliasResolver, AliasStats};
use crate::config::{BackupConfig, ConfigError};
use crate::download::{
    DownloadEngine, DownloadStats, DownloadTask, EngineError, HttpClient, ImageFetcher,
};
use crate::slack::{EmojiDirectory, ListingError, SlackClient};

/// Fatal errors for a backup run.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Rejected engine settings.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// No usable listing. An API error displays the API's message verbatim.
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// The target directory could not be created.
    #[error("failed to create target directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct BackupReport {
    /// Entries in the listing (direct and alias).
    pub listed: usize,
    /// Direct image results.
    pub downloads: DownloadStats,
    /// Alias results.
    pub aliases: AliasStats,
}

impl BackupReport {
    /// Number of emoji that could not be backed up in this run.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.downloads.failed() + self.aliases.failed
    }
}

/// A configured backup pipeline.
pub struct Backup {
    directory: Box<dyn EmojiDirectory>,
    fetcher: ImageFetcher,
    engine: DownloadEngine,
    resolver: AliasResolver,
    target_dir: PathBuf,
}

impl std::fmt::Debug for Backup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backup")
            .field("engine", &self.engine)
            .field("resolver", &self.resolver)
            .field("target_dir", &self.target_dir)
            .finish_non_exhaustive()
    }
}

impl Backup {
    /// Builds the pipeline against Slack's listing endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] for invalid configuration or if the HTTP
    /// client cannot be built.
    pub fn from_config(config: &BackupConfig) -> Result<Self, BackupError> {
        config.validate()?;
        let http = HttpClient::with_connect_timeout(config.connect_timeout)
            .map_err(BackupError::HttpClient)?;
        let slack = SlackClient::new(&http, &config.listing_endpoint, config.api_token.clone());
        Self::with_directory(config, Box::new(slack), http)
    }

    /// Builds the pipeline with a caller-supplied listing source.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Engine`] if the concurrency is out of range.
    pub fn with_directory(
        config: &BackupConfig,
        directory: Box<dyn EmojiDirectory>,
        http: HttpClient,
    ) -> Result<Self, BackupError> {
        let engine = DownloadEngine::new(config.concurrency)?;
        Ok(Self {
            directory,
            fetcher: ImageFetcher::new(http, &config.target_dir),
            engine,
            resolver: AliasResolver::new(&config.target_dir, config.link_mode),
            target_dir: config.target_dir.clone(),
        })
    }

    /// Runs listing → downloads → aliases.
    ///
    /// The listing is fetched before anything touches the filesystem, so a
    /// rejected token leaves the target directory untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Listing`] if the listing cannot be fetched and
    /// [`BackupError::CreateDir`] if the target directory cannot be created.
    /// Per-emoji failures are counted in the report instead.
    #[instrument(skip(self), fields(target_dir = %self.target_dir.display()))]
    pub async fn run(&self) -> Result<BackupReport, BackupError> {
        let listing = self.directory.fetch_listing().await?;

        tokio::fs::create_dir_all(&self.target_dir)
            .await
            .map_err(|source| BackupError::CreateDir {
                path: self.target_dir.clone(),
                source,
            })?;

        let tasks: Vec<DownloadTask> = listing
            .direct_entries()
            .map(|(name, url)| DownloadTask::new(name, url))
            .collect();
        debug!(
            direct = tasks.len(),
            aliases = listing.len() - tasks.len(),
            "partitioned listing"
        );

        let downloads = self.engine.run_all(&self.fetcher, tasks).await;
        let aliases = self.resolver.resolve_aliases(&listing).await;

        let report = BackupReport {
            listed: listing.len(),
            downloads,
            aliases,
        };
        info!(listed = report.listed, failed = report.failed(), "backup finished");
        Ok(report)
    }
}

/// Convenience wrapper: build from `config` and run once.
///
/// # Errors
///
/// Returns any fatal [`BackupError`] from construction or the run.
pub async fn run_backup(config: &BackupConfig) -> Result<BackupReport, BackupError> {
    Backup::from_config(config)?.run().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::slack::{ApiToken, EmojiListing};

    struct StaticDirectory(Result<EmojiListing, String>);

    #[async_trait]
    impl EmojiDirectory for StaticDirectory {
        async fn fetch_listing(&self) -> Result<EmojiListing, ListingError> {
            self.0.clone().map_err(ListingError::api)
        }
    }

    #[tokio::test]
    async fn test_api_failure_touches_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("emoji");
        let config = BackupConfig::new(ApiToken::new("t"), &target);
        let backup = Backup::with_directory(
            &config,
            Box::new(StaticDirectory(Err("invalid_auth".to_string()))),
            HttpClient::new(),
        )
        .unwrap();

        let error = backup.run().await.unwrap_err();

        assert_eq!(error.to_string(), "invalid_auth");
        assert!(!target.exists(), "target dir must not be created");
    }

    #[tokio::test]
    async fn test_empty_listing_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("nested/emoji");
        let config = BackupConfig::new(ApiToken::new("t"), &target);
        let backup = Backup::with_directory(
            &config,
            Box::new(StaticDirectory(Ok(EmojiListing::default()))),
            HttpClient::new(),
        )
        .unwrap();

        let report = backup.run().await.unwrap();

        assert_eq!(report.listed, 0);
        assert_eq!(report.failed(), 0);
        assert!(target.is_dir());
    }

    #[test]
    fn test_invalid_concurrency_rejected_at_construction() {
        let config = BackupConfig::new(ApiToken::new("t"), "emoji").with_concurrency(0);
        let result = Backup::from_config(&config);
        assert!(matches!(result, Err(BackupError::Engine(_))));
    }

    #[test]
    fn test_empty_token_rejected_at_construction() {
        let config = BackupConfig::new(ApiToken::new(""), "emoji");
        let result = Backup::from_config(&config);
        assert!(matches!(result, Err(BackupError::Config(ConfigError::EmptyToken))));
    }
}
