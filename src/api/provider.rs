use async_trait::async_trait;
use thiserror::Error;

/// Authorization URL together with the CSRF state embedded in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUrl {
    pub url: String,
    pub state: String,
}

/// Identity returned by the provider after a successful code exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    /// 24-hex object id of the user at the provider
    pub id: String,
    pub token: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub bio: String,
    pub gender: i32,
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to reach identity provider: {0}")]
    Transport(String),

    #[error("Identity provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

/// OAuth identity provider used by the login flow
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Build the URL the browser is sent to, with a fresh state
    fn login_url(&self, return_url: &str) -> Result<LoginUrl, ProviderError>;

    /// Trade an authorization code for the caller's identity and token
    async fn exchange(&self, code: &str) -> Result<ProviderIdentity, ProviderError>;
}
