use serde::Deserialize;
use ureq::Agent;

use super::{AccessToken, DEFAULT_AUTH_BASE_URL};
use crate::config::Config;
use crate::error::AuthError;
use crate::utils::{http_agent, HTTP_TIMEOUT};

/// Source of app access tokens.
///
/// Implementations make a single attempt per call; retry policy belongs to the caller.
pub trait CredentialProvider {
    fn acquire_token(&self) -> Result<AccessToken, AuthError>;
}

/// Response from `POST /oauth2/token` for the client-credentials grant.
#[derive(Deserialize, Debug)]
pub struct AppTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Client-credentials token provider for the Twitch OAuth endpoint.
pub struct TwitchAuth {
    agent: Agent,
    client_id: String,
    client_secret: String,
    base_url: String,
}

impl TwitchAuth {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, None)
    }

    /// Creates a provider against a custom base URL (useful for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Self {
        Self::with_agent(config, base_url, http_agent(HTTP_TIMEOUT))
    }

    /// Creates a client that sends its requests through `agent`.
    pub fn with_agent(config: &Config, base_url: Option<String>, agent: Agent) -> Self {
        TwitchAuth {
            agent,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_AUTH_BASE_URL.to_string()),
        }
    }
}

impl CredentialProvider for TwitchAuth {
    fn acquire_token(&self) -> Result<AccessToken, AuthError> {
        tracing::info!("Requesting new Twitch API token");

        let endpoint = format!("{}/oauth2/token", self.base_url);
        let response = self.agent.post(&endpoint).send_form([
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ]);

        let mut response = match response {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => {
                return Err(AuthError::Request(format!("HTTP {code}")));
            }
            Err(e) => return Err(AuthError::Request(format!("Network error: {e}"))),
        };

        let body: AppTokenResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| AuthError::Response(format!("Failed to parse token response: {e}")))?;

        if body.access_token.is_empty() {
            return Err(AuthError::Response("access_token is empty".into()));
        }

        tracing::info!(
            expires_in = body.expires_in,
            token_type = body.token_type.as_deref().unwrap_or("unknown"),
            "Got Twitch API token"
        );

        Ok(AccessToken::new(body.access_token))
    }
}
