//! Error types for the emoji listing request.
//!
//! Every variant here is fatal to a backup run: without a listing there is
//! nothing to download.

use thiserror::Error;

/// Errors that can occur while fetching the emoji listing.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The configured endpoint could not be combined with the token into a URL.
    #[error("invalid listing endpoint: {endpoint}")]
    InvalidEndpoint {
        /// The endpoint as configured.
        endpoint: String,
    },

    /// Network-level failure (DNS, connection refused, TLS, body read).
    ///
    /// The source error has its URL stripped so the token never reaches logs.
    #[error("network error fetching emoji listing: {source}")]
    Network {
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The listing endpoint answered with a non-success HTTP status.
    #[error("HTTP {status} fetching emoji listing")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not a JSON object of the listing shape.
    #[error("malformed emoji listing response: {source}")]
    Decode {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The API answered `ok: false`. Displays the API's message verbatim.
    #[error("{message}")]
    Api {
        /// The `error` field of the response, e.g. `invalid_auth`.
        message: String,
    },
}

impl ListingError {
    /// Creates an invalid endpoint error.
    pub fn invalid_endpoint(endpoint: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
        }
    }

    /// Creates a network error, dropping the request URL (it carries the token).
    #[must_use]
    pub fn network(source: reqwest::Error) -> Self {
        Self::Network {
            source: source.without_url(),
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(status: u16) -> Self {
        Self::HttpStatus { status }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(source: serde_json::Error) -> Self {
        Self::Decode { source }
    }

    /// Creates an API error carrying the upstream message.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}
