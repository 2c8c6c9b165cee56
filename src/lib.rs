//! Emoji Backup Core Library
//!
//! This library backs up a Slack workspace's custom emoji to a local
//! directory: one listing request, concurrent image downloads, then alias
//! files derived from the downloaded images. Re-running against the same
//! directory only fetches what is still missing.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`slack`] - Listing request, listing model, alias/direct classification
//! - [`download`] - HTTP client, filename rule, image fetcher, worker pool
//! - [`alias`] - Alias chain resolution and hardlink/copy materialization
//! - [`backup`] - Orchestration of the three phases
//! - [`config`] - Immutable run configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod alias;
pub mod backup;
pub mod config;
pub mod download;
pub mod slack;
mod user_agent;

// Re-export commonly used types
pub use alias::{AliasResolver, AliasStats, LinkMode};
pub use backup::{Backup, BackupError, BackupReport, run_backup};
pub use config::{BackupConfig, DEFAULT_TARGET_DIR};
pub use download::{DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats, HttpClient, ImageFetcher};
pub use slack::{ApiToken, DEFAULT_LISTING_ENDPOINT, EmojiDirectory, EmojiListing, SlackClient};
