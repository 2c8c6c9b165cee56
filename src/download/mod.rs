//! Concurrent emoji image downloads.
//!
//! # Features
//!
//! - Deterministic `name + ext` destination paths shared with alias files
//! - Skip-if-present before any network access (re-runs resume cheaply)
//! - Create-new writes that never overwrite an existing file
//! - Fixed-size worker pool with per-item failure isolation
//!
//! # Example
//!
//! ```no_run
//! use emoji_backup_core::download::{HttpClient, ImageFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = ImageFetcher::new(HttpClient::new(), "emoji");
//! let outcome = fetcher.fetch_one("party", "https://x/party.gif").await?;
//! println!("{}", outcome.path().display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod fetcher;
mod filename;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY};
pub use engine::{DownloadEngine, DownloadStats, DownloadTask, EngineError};
pub use error::DownloadError;
pub use fetcher::{FetchOutcome, ImageFetcher};
pub use filename::{
    DEFAULT_EXTENSION, InvalidEmojiName, emoji_filename, emoji_path, extension_from_url,
};
