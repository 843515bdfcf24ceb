use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::provider::{LoginUrl, OAuthProvider, ProviderError, ProviderIdentity};
use crate::core::config::OAuthConfig;
use crate::utils::auth::random_hex;

/// HTTP client for the Violet identity provider
pub struct VioletClient {
    client: reqwest::Client,
    config: OAuthConfig,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub token: String,
}

/// User info endpoint response
#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub gender: i32,
}

impl VioletClient {
    pub fn new(config: OAuthConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn authorize_url(&self, return_url: &str, state: &str) -> Result<String, ProviderError> {
        let query = serde_urlencoded::to_string([
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", return_url),
            ("scope", self.config.scope.as_str()),
            ("state", state),
        ])
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let separator = if self.config.authorize_url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.config.authorize_url, separator, query))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Identity provider returned an error status");
        Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_token(&self, code: &str) -> Result<TokenResponse, ProviderError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Self::check_status(response)
            .await?
            .json::<TokenResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    async fn fetch_profile(&self, token: &str) -> Result<ProfileResponse, ProviderError> {
        let response = self
            .client
            .get(&self.config.user_info_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Self::check_status(response)
            .await?
            .json::<ProfileResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl OAuthProvider for VioletClient {
    fn login_url(&self, return_url: &str) -> Result<LoginUrl, ProviderError> {
        let state = random_hex(16);
        let url = self.authorize_url(return_url, &state)?;
        Ok(LoginUrl { url, state })
    }

    async fn exchange(&self, code: &str) -> Result<ProviderIdentity, ProviderError> {
        let token = self.fetch_token(code).await?;
        debug!(user_id = %token.user_id, "Authorization code exchanged");

        let profile = self.fetch_profile(&token.token).await?;

        Ok(ProviderIdentity {
            id: token.user_id,
            token: token.token,
            email: profile.email,
            name: profile.name,
            avatar: profile.avatar,
            bio: profile.bio,
            gender: profile.gender,
        })
    }
}
