//! Shared User-Agent string for listing and image requests.
//!
//! Single source for the project URL and UA format so Slack API traffic and
//! emoji CDN traffic identify the tool the same way.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/emoji-backup";

/// Default User-Agent for every request the tool makes.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("emoji-backup/{version} (+{PROJECT_UA_URL})")
}
