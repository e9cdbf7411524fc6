//! Error taxonomy for the watcher.
//!
//! Only [`ConfigError`] and an [`AuthError`] from the very first token request
//! are fatal. Everything raised inside the poll loop is logged and absorbed at
//! the cycle boundary.

use thiserror::Error;

/// Configuration could not be assembled from the environment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("Missing environment variable {0}. Did you set up your .env file?")]
    Missing(&'static str),
    /// A variable is set but cannot be used.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Failure to obtain an app access token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The token endpoint was unreachable, timed out, or answered with a non-success status.
    #[error("token request failed: {0}")]
    Request(String),
    /// The token endpoint answered, but the body had no usable `access_token`.
    #[error("unexpected token response: {0}")]
    Response(String),
}

/// Failure to determine the live status of the channel.
///
/// `AuthExpired` is kept apart from `Transient` because the watcher refreshes
/// the token for the former and simply carries its belief forward for the latter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("access token expired or invalid")]
    AuthExpired,
    #[error("stream status check failed: {0}")]
    Transient(String),
}

/// The notification action could not be performed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to open {url}: {reason}")]
pub struct NotifyError {
    pub url: String,
    pub reason: String,
}

/// Top-level error surfaced by the binary.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
