use ureq::Agent;

use super::{AccessToken, HelixResponse, LiveStatus, Stream, DEFAULT_HELIX_BASE_URL};
use crate::config::Config;
use crate::error::CheckError;
use crate::utils::{http_agent, HTTP_TIMEOUT};

/// Answers "is the channel broadcasting right now".
pub trait StatusChecker {
    /// A rejected token must surface as [`CheckError::AuthExpired`]; every
    /// other failure is [`CheckError::Transient`].
    fn check_live(&self, token: &AccessToken) -> Result<LiveStatus, CheckError>;
}

/// Live status lookup through `GET /helix/streams`.
pub struct TwitchStreams {
    agent: Agent,
    client_id: String,
    channel_login: String,
    base_url: String,
}

impl TwitchStreams {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, None)
    }

    /// Creates a checker against a custom base URL (useful for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Self {
        Self::with_agent(config, base_url, http_agent(HTTP_TIMEOUT))
    }

    /// Creates a client that sends its requests through `agent`.
    pub fn with_agent(config: &Config, base_url: Option<String>, agent: Agent) -> Self {
        TwitchStreams {
            agent,
            client_id: config.client_id.clone(),
            channel_login: config.channel_login.clone(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_HELIX_BASE_URL.to_string()),
        }
    }
}

impl StatusChecker for TwitchStreams {
    fn check_live(&self, token: &AccessToken) -> Result<LiveStatus, CheckError> {
        let endpoint = format!("{}/helix/streams", self.base_url);
        let authorization = format!("Bearer {}", token.secret());

        let response = self
            .agent
            .get(&endpoint)
            .header("Client-Id", &self.client_id)
            .header("Authorization", &authorization)
            .query("user_login", &self.channel_login)
            .call();

        let mut response = match response {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(401)) => return Err(CheckError::AuthExpired),
            Err(ureq::Error::StatusCode(code)) => {
                return Err(CheckError::Transient(format!("HTTP {code}")));
            }
            Err(e) => return Err(CheckError::Transient(format!("Network error: {e}"))),
        };

        let body: HelixResponse<Stream> = response
            .body_mut()
            .read_json()
            .map_err(|e| CheckError::Transient(format!("Failed to parse streams response: {e}")))?;

        if body.data.len() > 1 {
            tracing::debug!(
                count = body.data.len(),
                "Multiple streams listed for one login, treating as live"
            );
        }

        Ok(match body.data.into_iter().next() {
            Some(stream) => LiveStatus::Live(stream),
            None => LiveStatus::Offline,
        })
    }
}
