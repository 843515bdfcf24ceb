// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Login flow (session cookie)
        .route("/auth/login-url", post(crate::handlers::auth::login_url_handler))
        .route("/auth/login", post(crate::handlers::auth::login_handler))
        .route("/auth/logout", post(crate::handlers::auth::logout_handler))
        .route("/auth/me", get(crate::handlers::auth::me_handler))

        // User administration (require API key)
        .route("/user/get", get(crate::handlers::admin::user_get_handler))
        .route("/user/add", get(crate::handlers::admin::user_add_handler))
        .route("/user/token", get(crate::handlers::admin::user_token_handler))

        .route("/health", get(crate::handlers::health::health_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
