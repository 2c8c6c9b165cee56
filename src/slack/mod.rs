//! Slack emoji directory: the listing request and its data model.
//!
//! # Architecture
//!
//! - [`EmojiDirectory`] - Async trait for anything that can produce a listing
//! - [`SlackClient`] - The `emoji.list` implementation
//! - [`EmojiListing`] - Parsed name → target mapping
//! - [`EmojiTarget`] - Alias / Direct classification of a listing value
//!
//! # Example
//!
//! ```no_run
//! use emoji_backup_core::download::HttpClient;
//! use emoji_backup_core::slack::{ApiToken, DEFAULT_LISTING_ENDPOINT, SlackClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = HttpClient::new();
//! let slack = SlackClient::new(&http, DEFAULT_LISTING_ENDPOINT, ApiToken::new("xoxp-..."));
//! let listing = slack.fetch_listing().await?;
//! println!("{} emoji", listing.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod listing;
mod token;

pub use client::{DEFAULT_LISTING_ENDPOINT, SlackClient};
pub use error::ListingError;
pub use listing::{ALIAS_PREFIX, EmojiEntry, EmojiListing, EmojiTarget, ListingOutcome};
pub use token::ApiToken;

use async_trait::async_trait;

/// Source of an emoji listing.
///
/// The backup pipeline only depends on this trait, so tests and alternative
/// sources (e.g. a listing exported to disk) can stand in for Slack.
#[async_trait]
pub trait EmojiDirectory: Send + Sync {
    /// Fetches the complete listing in one call.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError`] when no usable listing could be obtained.
    async fn fetch_listing(&self) -> Result<EmojiListing, ListingError>;
}
