//! Slack API token wrapper.

use std::fmt;

/// A Slack API token.
///
/// `Debug` and `Display` are redacted so the token can travel inside config
/// structs that end up in tracing output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a raw token string. Surrounding whitespace is trimmed.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self(raw.trim().to_string())
    }

    /// Returns the raw token for placing on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true when the token is empty after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ApiToken {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = ApiToken::new("xoxp-secret");
        assert!(!format!("{token:?}").contains("secret"));
        assert!(!token.to_string().contains("secret"));
        assert_eq!(token.expose(), "xoxp-secret");
    }

    #[test]
    fn test_token_trims_whitespace() {
        assert_eq!(ApiToken::new("  xoxb-1\n").expose(), "xoxb-1");
        assert!(ApiToken::new("   ").is_empty());
    }
}
