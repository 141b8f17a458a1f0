use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::error::ApiError;
use crate::models::SessionToken;

/// Client for the third-party identity provider that trades a backend
/// custom token for a session id token. Everything behind the base URL is
/// opaque to this crate.
pub struct IdentityClient {
    client: Client,
    base_url: String,
}

impl IdentityClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn exchange_custom_token(&self, custom_token: &str) -> Result<SessionToken, ApiError> {
        let url = format!("{}/v1/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "token": custom_token,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("token exchange failed with {}: {}", status, body);
            return Err(ApiError::Application(
                "could not establish a session, please log in again".to_string(),
            ));
        }

        let session: SessionToken = response.json().await?;
        Ok(session)
    }
}
