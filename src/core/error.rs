// Centralized error handling for the account service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::auth::ErrorResponse;

/// Errors raised by the key-value layer and the user store on top of it
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid user identifier: {0}")]
    InvalidIdentifier(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Failed to (de)serialize user record: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Stable machine-readable code, shared with the legacy GraphQL service
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidIdentifier(_) => "not_id",
            StoreError::NotFound(_) => "not_found",
            StoreError::Serialization(_) => "serialization",
            StoreError::Storage(_) => "storage",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Transaction failures are the only kind worth retrying
            StoreError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Errors surfaced by the login flow
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Session is already logged in")]
    AlreadyLoggedIn,

    #[error("OAuth state does not match the session")]
    StateMismatch,

    #[error("Session is not logged in")]
    NotLoggedIn,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::AlreadyLoggedIn => "already_login",
            AuthError::StateMismatch => "error_state",
            AuthError::NotLoggedIn => "not_login",
            AuthError::Provider(_) => "provider",
            AuthError::Store(e) => e.code(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AlreadyLoggedIn => StatusCode::CONFLICT,
            AuthError::StateMismatch => StatusCode::BAD_REQUEST,
            AuthError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            AuthError::Provider(_) => StatusCode::BAD_GATEWAY,
            AuthError::Store(e) => e.status(),
        }
    }
}

/// Errors for the API-key protected user endpoints
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn error_response(status: StatusCode, code: &'static str, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), self.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.code(), self.to_string())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            AdminError::Store(e) => e.into_response(),
            other => error_response(StatusCode::UNAUTHORIZED, "invalid_api_key", other.to_string()),
        }
    }
}
