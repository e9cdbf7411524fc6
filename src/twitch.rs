//! Twitch API client: app access tokens and live status lookups.

pub mod auth;
pub mod streams;

pub use auth::{CredentialProvider, TwitchAuth};
pub use streams::{StatusChecker, TwitchStreams};

use serde::Deserialize;

/// Default base URL for the Twitch OAuth endpoints.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://id.twitch.tv";

/// Default base URL for the Helix API.
pub const DEFAULT_HELIX_BASE_URL: &str = "https://api.twitch.tv";

/// Public channel page prefix.
pub const CHANNEL_BASE_URL: &str = "https://www.twitch.tv";

/// An app access token.
///
/// The value is opaque and its lifetime is decided by Twitch; a token is only
/// ever replaced wholesale after the API rejects it.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        AccessToken(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Wrapper for Helix list responses.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A stream entry from `GET /helix/streams`.
///
/// Only the fields used for logging are kept, and all of them are optional so
/// that a listing entry is never rejected for its shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub started_at: Option<String>,
}

/// Result of a successful status lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveStatus {
    /// The listing is non-empty. Holds the first entry.
    Live(Stream),
    Offline,
}

impl LiveStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, LiveStatus::Live(_))
    }
}

/// Canonical page for a channel, opened when it goes live.
pub fn channel_url(channel_login: &str) -> String {
    format!("{CHANNEL_BASE_URL}/{channel_login}")
}
