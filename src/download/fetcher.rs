//! Single-image fetch with skip-if-present and create-new writes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

use super::error::DownloadError;
use super::filename::emoji_path;
use super::HttpClient;

/// What [`ImageFetcher::fetch_one`] did for an emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The destination already existed; nothing was requested.
    Exists(PathBuf),
    /// The image was downloaded and written.
    Saved(PathBuf),
}

impl FetchOutcome {
    /// Destination path of the emoji.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Exists(path) | Self::Saved(path) => path,
        }
    }
}

/// Downloads one emoji image into the target directory.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: HttpClient,
    target_dir: PathBuf,
}

impl ImageFetcher {
    /// Creates a fetcher writing into `target_dir` (which must already exist).
    pub fn new(client: HttpClient, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            target_dir: target_dir.into(),
        }
    }

    /// Directory images are written into.
    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Fetches `url` into `target_dir/name + ext` unless that file exists.
    ///
    /// The existence check happens before any network access, so re-running
    /// a backup only requests images that are still missing. The write uses
    /// create-new semantics: a file that appears between the check and the
    /// write is reported as [`FetchOutcome::Exists`] and left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] for invalid names or URLs, network and HTTP
    /// failures, and filesystem errors. A partially written file is removed.
    #[instrument(level = "debug", skip(self, url), fields(emoji = %name))]
    pub async fn fetch_one(&self, name: &str, url: &str) -> Result<FetchOutcome, DownloadError> {
        let path = emoji_path(&self.target_dir, name, url)?;

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;
        if exists {
            info!(emoji = name, path = %path.display(), "exists");
            return Ok(FetchOutcome::Exists(path));
        }

        let body = self.client.fetch_bytes(url).await?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                info!(emoji = name, path = %path.display(), "exists");
                return Ok(FetchOutcome::Exists(path));
            }
            Err(e) => return Err(DownloadError::io(path, e)),
        };

        if let Err(e) = write_body(&mut file, &body).await {
            drop(file);
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %cleanup, "failed to remove partial file");
            }
            return Err(DownloadError::io(path, e));
        }

        info!(emoji = name, path = %path.display(), bytes = body.len(), "saved");
        Ok(FetchOutcome::Saved(path))
    }
}

async fn write_body(file: &mut File, body: &[u8]) -> std::io::Result<()> {
    file.write_all(body).await?;
    file.flush().await?;
    file.sync_all().await
}
