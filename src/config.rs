use std::{env, path::PathBuf, time::Duration};

use crate::error::ConfigError;

pub const CLIENT_ID_KEY: &str = "TWITCH_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "TWITCH_CLIENT_SECRET";
pub const STREAMER_LOGIN_KEY: &str = "TWITCH_STREAMER_LOGIN";
pub const POLL_INTERVAL_KEY: &str = "POLL_INTERVAL";

/// Poll every three minutes unless told otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(180);

/// Immutable runtime configuration, built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Lowercased channel login.
    pub channel_login: String,
    pub poll_interval: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("channel_login", &self.channel_login)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// Call [`load_dotenv`] first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Required values that are unset or blank produce [`ConfigError::Missing`];
    /// a poll interval that is not a positive whole number of seconds produces
    /// [`ConfigError::Invalid`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let client_id = required(CLIENT_ID_KEY)?;
        let client_secret = required(CLIENT_SECRET_KEY)?;
        let channel_login = required(STREAMER_LOGIN_KEY)?.to_lowercase();

        let poll_interval = match lookup(POLL_INTERVAL_KEY) {
            None => DEFAULT_POLL_INTERVAL,
            Some(raw) if raw.trim().is_empty() => DEFAULT_POLL_INTERVAL,
            Some(raw) => parse_poll_interval(&raw)?,
        };

        Ok(Config {
            client_id,
            client_secret,
            channel_login,
            poll_interval,
        })
    }
}

fn parse_poll_interval(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: POLL_INTERVAL_KEY,
        value: raw.to_string(),
        reason: "expected a whole number of seconds",
    })?;

    if secs == 0 {
        return Err(ConfigError::Invalid {
            key: POLL_INTERVAL_KEY,
            value: raw.to_string(),
            reason: "must be at least 1 second",
        });
    }

    Ok(Duration::from_secs(secs))
}

/// Candidate `.env` locations: next to the executable, then the working directory.
fn dotenv_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(mut exe_path) = env::current_exe() {
        exe_path.pop();
        candidates.push(exe_path.join(".env"));
    }
    candidates.push(PathBuf::from(".env"));
    candidates
}

/// Loads the first `.env` file found and returns its path. Variables already
/// present in the process environment are left untouched.
///
/// Runs before logging is set up, so it reports through its return value only.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv_candidates()
        .into_iter()
        .find(|path| dotenvy::from_path(path).is_ok())
}
