//! Emoji listing model and entry classification.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Marker that turns a listing value into a reference to another emoji.
pub const ALIAS_PREFIX: &str = "alias:";

/// What a listing value points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiTarget<'a> {
    /// A fetchable image URL.
    Direct(&'a str),
    /// The name of another emoji in the listing.
    Alias(&'a str),
}

impl<'a> EmojiTarget<'a> {
    /// Classifies a raw listing value.
    ///
    /// ```
    /// use emoji_backup_core::slack::EmojiTarget;
    ///
    /// assert_eq!(EmojiTarget::classify("alias:smile"), EmojiTarget::Alias("smile"));
    /// assert_eq!(
    ///     EmojiTarget::classify("https://x/smile.png"),
    ///     EmojiTarget::Direct("https://x/smile.png")
    /// );
    /// ```
    #[must_use]
    pub fn classify(value: &'a str) -> Self {
        match value.strip_prefix(ALIAS_PREFIX) {
            Some(target) => Self::Alias(target),
            None => Self::Direct(value),
        }
    }

    /// Returns true for alias targets.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias(_))
    }
}

/// One `(name, target)` pair from the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiEntry<'a> {
    /// Emoji name as shown in Slack (without colons).
    pub name: &'a str,
    /// Classified target.
    pub target: EmojiTarget<'a>,
}

/// Parsed, immutable emoji listing (name → raw target value).
///
/// Entries are kept in name order so runs are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiListing {
    entries: BTreeMap<String, String>,
}

impl EmojiListing {
    /// Builds a listing from `(name, target)` pairs.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of entries (direct and alias).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the workspace has no custom emoji.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up and classifies the target for `name`.
    #[must_use]
    pub fn target_of(&self, name: &str) -> Option<EmojiTarget<'_>> {
        self.entries
            .get(name)
            .map(String::as_str)
            .map(EmojiTarget::classify)
    }

    /// Iterates over every classified entry.
    pub fn entries(&self) -> impl Iterator<Item = EmojiEntry<'_>> {
        self.entries.iter().map(|(name, value)| EmojiEntry {
            name,
            target: EmojiTarget::classify(value),
        })
    }

    /// Iterates over direct entries as `(name, url)`.
    pub fn direct_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries().filter_map(|entry| match entry.target {
            EmojiTarget::Direct(url) => Some((entry.name, url)),
            EmojiTarget::Alias(_) => None,
        })
    }

    /// Iterates over alias entries as `(name, referenced_name)`.
    pub fn alias_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries().filter_map(|entry| match entry.target {
            EmojiTarget::Alias(target) => Some((entry.name, target)),
            EmojiTarget::Direct(_) => None,
        })
    }
}

/// Result of an `emoji.list` call with the API's error-as-value folded out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    /// `ok: true`; the listing is usable.
    Success(EmojiListing),
    /// `ok: false`; `message` is the API's `error` field.
    Failure {
        /// Upstream diagnostic, e.g. `invalid_auth`.
        message: String,
    },
}

/// Wire shape of the `emoji.list` response.
#[derive(Debug, Deserialize)]
pub(crate) struct ListingResponse {
    ok: bool,
    #[serde(default)]
    emoji: BTreeMap<String, String>,
    #[serde(default)]
    error: Option<String>,
}

/// Message used when the API reports failure without an `error` field.
const UNKNOWN_API_ERROR: &str = "unknown_error";

impl ListingResponse {
    /// Converts the wire struct into a tagged outcome.
    pub(crate) fn into_outcome(self) -> ListingOutcome {
        if self.ok {
            ListingOutcome::Success(EmojiListing {
                entries: self.emoji,
            })
        } else {
            ListingOutcome::Failure {
                message: self
                    .error
                    .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ListingOutcome {
        serde_json::from_str::<ListingResponse>(raw)
            .unwrap()
            .into_outcome()
    }

    #[test]
    fn test_classify_alias_strips_prefix() {
        assert_eq!(EmojiTarget::classify("alias:party"), EmojiTarget::Alias("party"));
    }

    #[test]
    fn test_classify_url_is_direct() {
        let url = "https://emoji.slack-edge.com/T1/party/abc.gif";
        assert_eq!(EmojiTarget::classify(url), EmojiTarget::Direct(url));
    }

    #[test]
    fn test_classify_prefix_is_case_sensitive() {
        assert!(!EmojiTarget::classify("Alias:party").is_alias());
    }

    #[test]
    fn test_outcome_success_keeps_entries() {
        let outcome =
            parse(r#"{"ok":true,"emoji":{"smile":"https://x/smile.png","grin":"alias:smile"}}"#);
        let ListingOutcome::Success(listing) = outcome else {
            panic!("expected success");
        };
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.target_of("grin"), Some(EmojiTarget::Alias("smile")));
    }

    #[test]
    fn test_outcome_failure_carries_error_verbatim() {
        let outcome = parse(r#"{"ok":false,"error":"invalid_auth"}"#);
        assert_eq!(
            outcome,
            ListingOutcome::Failure {
                message: "invalid_auth".to_string()
            }
        );
    }

    #[test]
    fn test_outcome_failure_ignores_entries() {
        let outcome = parse(r#"{"ok":false,"error":"ratelimited","emoji":{"a":"https://x/a"}}"#);
        assert!(matches!(outcome, ListingOutcome::Failure { .. }));
    }

    #[test]
    fn test_outcome_failure_without_message() {
        let outcome = parse(r#"{"ok":false}"#);
        assert_eq!(
            outcome,
            ListingOutcome::Failure {
                message: UNKNOWN_API_ERROR.to_string()
            }
        );
    }

    #[test]
    fn test_response_ignores_unknown_fields() {
        let outcome = parse(r#"{"ok":true,"emoji":{},"cache_ts":"1700000000.0"}"#);
        assert_eq!(outcome, ListingOutcome::Success(EmojiListing::default()));
    }

    #[test]
    fn test_response_without_ok_is_rejected() {
        assert!(serde_json::from_str::<ListingResponse>(r#"{"emoji":{}}"#).is_err());
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let listing = EmojiListing::from_entries([
            ("a", "https://x/a.png"),
            ("b", "alias:a"),
            ("c", "https://x/c"),
            ("d", "alias:missing"),
        ]);

        let direct: Vec<_> = listing.direct_entries().map(|(n, _)| n).collect();
        let aliases: Vec<_> = listing.alias_entries().map(|(n, _)| n).collect();

        assert_eq!(direct, ["a", "c"]);
        assert_eq!(aliases, ["b", "d"]);
        assert_eq!(direct.len() + aliases.len(), listing.len());
    }
}
