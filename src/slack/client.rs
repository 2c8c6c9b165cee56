//! Client for the Slack `emoji.list` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use super::error::ListingError;
use super::listing::{EmojiListing, ListingOutcome, ListingResponse};
use super::token::ApiToken;
use super::EmojiDirectory;
use crate::download::HttpClient;

/// Default Slack listing endpoint.
pub const DEFAULT_LISTING_ENDPOINT: &str = "https://slack.com/api/emoji.list";

/// Fetches a workspace's custom emoji listing from Slack.
///
/// Shares the connection pool of the [`HttpClient`] it was built from.
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: Client,
    endpoint: String,
    token: ApiToken,
}

impl SlackClient {
    /// Creates a client for `endpoint` authenticating with `token`.
    pub fn new(http: &HttpClient, endpoint: impl Into<String>, token: ApiToken) -> Self {
        Self {
            client: http.inner().clone(),
            endpoint: endpoint.into(),
            token,
        }
    }

    /// Issues the single listing request.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError`] for network failures, undecodable bodies and
    /// `ok: false` responses, whose `error` string is kept verbatim even when
    /// the HTTP status is an error. A non-success status is reported as
    /// [`ListingError::HttpStatus`] only when its body is not a listing
    /// response.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_listing(&self) -> Result<EmojiListing, ListingError> {
        let url = Url::parse_with_params(&self.endpoint, [("token", self.token.expose())])
            .map_err(|_| ListingError::invalid_endpoint(&self.endpoint))?;

        debug!("requesting emoji listing");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ListingError::network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(ListingError::network)?;
        debug!(status = status.as_u16(), bytes = body.len(), "received emoji listing");

        // Slack pairs some error statuses (e.g. 429) with an `ok: false` body;
        // its message wins over the bare status.
        let decoded: ListingResponse = match serde_json::from_slice(&body) {
            Ok(decoded) => decoded,
            Err(_) if !status.is_success() => {
                return Err(ListingError::http_status(status.as_u16()));
            }
            Err(e) => return Err(ListingError::decode(e)),
        };
        match decoded.into_outcome() {
            ListingOutcome::Success(listing) => {
                info!(entries = listing.len(), "fetched emoji listing");
                Ok(listing)
            }
            ListingOutcome::Failure { message } => Err(ListingError::api(message)),
        }
    }
}

#[async_trait]
impl EmojiDirectory for SlackClient {
    async fn fetch_listing(&self) -> Result<EmojiListing, ListingError> {
        SlackClient::fetch_listing(self).await
    }
}
