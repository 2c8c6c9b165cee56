//! Destination path rule shared by image downloads and alias files.
//!
//! An emoji named `name` whose image lives at `url` is stored as
//! `target_dir/name + ext`, where `ext` is the suffix of the URL's last path
//! segment (dot included) or [`DEFAULT_EXTENSION`]. Aliases apply the same
//! rule to their target's URL so they inherit the target's extension.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

/// Extension used when the URL path has no suffix.
pub const DEFAULT_EXTENSION: &str = ".png";

/// An emoji name that cannot be used as a file name inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("emoji name {name:?} is not a valid file name")]
pub struct InvalidEmojiName {
    /// The rejected name.
    pub name: String,
}

/// Returns the extension (with leading dot) of the URL's last path segment.
///
/// Query strings and fragments are ignored. Falls back to
/// [`DEFAULT_EXTENSION`] when the URL cannot be parsed or its last segment
/// has no suffix.
///
/// ```
/// use emoji_backup_core::download::extension_from_url;
///
/// assert_eq!(extension_from_url("https://x/smile.jpg"), ".jpg");
/// assert_eq!(extension_from_url("https://x/smile"), ".png");
/// ```
#[must_use]
pub fn extension_from_url(url: &str) -> String {
    url_suffix(url).unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

fn url_suffix(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last_segment = parsed.path_segments()?.next_back()?;
    let dot_index = last_segment.rfind('.')?;
    let ext = &last_segment[dot_index..];
    (ext.len() > 1).then(|| ext.to_string())
}

/// Builds `name + ext` for an emoji whose image lives at `url`.
///
/// # Errors
///
/// Returns [`InvalidEmojiName`] for names that are empty, `.`/`..`, or
/// contain a path separator or NUL.
pub fn emoji_filename(name: &str, url: &str) -> Result<String, InvalidEmojiName> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(InvalidEmojiName {
            name: name.to_string(),
        });
    }
    Ok(format!("{name}{}", extension_from_url(url)))
}

/// Joins [`emoji_filename`] onto `target_dir`.
///
/// # Errors
///
/// Returns [`InvalidEmojiName`] under the same conditions as [`emoji_filename`].
pub fn emoji_path(target_dir: &Path, name: &str, url: &str) -> Result<PathBuf, InvalidEmojiName> {
    Ok(target_dir.join(emoji_filename(name, url)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_literal_suffix() {
        assert_eq!(extension_from_url("https://x/smile.jpg"), ".jpg");
        assert_eq!(
            extension_from_url("https://emoji.slack-edge.com/T0/party/1a2b3c.gif"),
            ".gif"
        );
    }

    #[test]
    fn test_extension_is_not_lowercased() {
        assert_eq!(extension_from_url("https://x/LOUD.PNG"), ".PNG");
    }

    #[test]
    fn test_extension_defaults_to_png() {
        assert_eq!(extension_from_url("https://x/smile"), ".png");
        assert_eq!(extension_from_url("https://x/"), ".png");
        assert_eq!(extension_from_url("https://x/smile."), ".png");
    }

    #[test]
    fn test_extension_ignores_query_and_fragment() {
        assert_eq!(extension_from_url("https://x/a.gif?v=2.0#frag.x"), ".gif");
        assert_eq!(extension_from_url("https://x/a?format=image.jpg"), ".png");
    }

    #[test]
    fn test_extension_ignores_dots_in_host_and_parent_segments() {
        assert_eq!(extension_from_url("https://cdn.example.com/v1.2/smile"), ".png");
    }

    #[test]
    fn test_extension_unparseable_url_defaults() {
        assert_eq!(extension_from_url(""), ".png");
        assert_eq!(extension_from_url("not a url"), ".png");
    }

    #[test]
    fn test_emoji_path_is_deterministic() {
        let dir = Path::new("emoji");
        let first = emoji_path(dir, "smile", "https://x/smile.jpg").unwrap();
        let second = emoji_path(dir, "smile", "https://x/smile.jpg").unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Path::new("emoji/smile.jpg"));
    }

    #[test]
    fn test_alias_inherits_target_extension() {
        let target_url = "https://x/smile.gif";
        assert_eq!(emoji_filename("grin", target_url).unwrap(), "grin.gif");
    }

    #[test]
    fn test_emoji_filename_rejects_path_like_names() {
        for name in ["", ".", "..", "a/b", "..\\evil", "nul\0byte"] {
            assert!(
                emoji_filename(name, "https://x/a.png").is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_emoji_filename_accepts_slack_names() {
        for name in ["+1", "simple_smile", "party-parrot", "don't"] {
            assert!(emoji_filename(name, "https://x/a.png").is_ok(), "{name:?}");
        }
    }
}
