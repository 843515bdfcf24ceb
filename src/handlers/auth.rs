use crate::core::error::AuthError;
use crate::core::state::AppState;
use crate::models::auth::{LoginRequest, LoginUrlRequest, LoginUrlResponse, SuccessResponse, UserResponse};
use crate::models::user::UserView;
use crate::stores::session_store::SessionHandle;
use crate::utils::time::unix_now;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Extract the session id from the Cookie header(s)
pub fn session_cookie<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn resolve_session(state: &AppState, headers: &HeaderMap) -> SessionHandle {
    let cookie = session_cookie(headers, &state.config.session.cookie_name);
    state.sessions.resolve(cookie, unix_now())
}

/// Existing live session only; requests without one never open a session
fn find_session(state: &AppState, headers: &HeaderMap) -> Option<SessionHandle> {
    let cookie = session_cookie(headers, &state.config.session.cookie_name)?;
    state.sessions.find(cookie, unix_now())
}

/// Attach a Set-Cookie header when the request opened a new session
fn with_session_cookie(state: &AppState, handle: &SessionHandle, mut response: Response) -> Response {
    if !handle.created {
        return response;
    }

    let session = &state.config.session;
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        session.cookie_name, handle.id, session.ttl
    );
    if session.secure_cookie {
        cookie.push_str("; Secure");
    }

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Failed to build session cookie"),
    }
    response
}

/// Start an OAuth login
///
/// POST /auth/login-url  {"return_url": "..."}
pub async fn login_url_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoginUrlRequest>,
) -> Response {
    let handle = resolve_session(&state, &headers);

    let response = match state.auth.create_login_url(handle.session.as_ref(), &body.return_url) {
        Ok(url) => (
            StatusCode::OK,
            Json(LoginUrlResponse { success: true, url }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    };

    with_session_cookie(&state, &handle, response)
}

/// Complete an OAuth login with the provider's code and state
///
/// POST /auth/login  {"code": "...", "state": "..."}
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Response {
    // Without a session there is no pending state to match
    let Some(handle) = find_session(&state, &headers) else {
        warn!("Login attempted without a session");
        return AuthError::StateMismatch.into_response();
    };

    let user = match state
        .auth
        .login(handle.session.as_ref(), &body.code, &body.state)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            warn!(error = %e, code = e.code(), "Login failed");
            return e.into_response();
        }
    };

    let response = (
        StatusCode::OK,
        Json(UserResponse {
            success: true,
            user: UserView::from(user),
        }),
    )
        .into_response();

    // Fresh id for the authenticated session
    match state.sessions.rotate(&handle.id, unix_now()) {
        Some(rotated) => with_session_cookie(&state, &rotated, response),
        None => {
            warn!(session = %handle.id, "Session expired during login");
            response
        }
    }
}

/// POST /auth/logout
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let handle = find_session(&state, &headers).ok_or(AuthError::NotLoggedIn)?;
    state.auth.logout(handle.session.as_ref())?;

    info!(session = %handle.id, "Session logged out");

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
        .into_response())
}

/// GET /auth/me
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, AuthError> {
    let handle = find_session(&state, &headers).ok_or(AuthError::NotLoggedIn)?;
    let user = state.auth.current_user(handle.session.as_ref())?;

    Ok((
        StatusCode::OK,
        Json(UserResponse {
            success: true,
            user: UserView::from(user),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::tests::test_config;
    use crate::models::auth::ErrorResponse;
    use crate::services::auth::tests::{FakeProvider, ALICE};
    use crate::stores::memory_store::MemoryStore;
    use crate::stores::session_store::{Session, SESSION_USER_ID};
    use http_body_util::BodyExt;

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            test_config(),
            Arc::new(MemoryStore::new()),
            Arc::new(FakeProvider::new("tok1")),
        ))
    }

    fn cookie_headers(response: &Response) -> HeaderMap {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie")
            .to_str()
            .unwrap();
        let pair = set_cookie.split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());
        headers
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_session_cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; reaper_sid=abc123; other=1"),
        );

        assert_eq!(session_cookie(&headers, "reaper_sid"), Some("abc123"));
        assert_eq!(session_cookie(&headers, "missing"), None);

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("reaper_sid="));
        assert_eq!(session_cookie(&empty, "reaper_sid"), None);
    }

    #[tokio::test]
    async fn test_full_login_flow() {
        let state = create_test_state();

        let response = login_url_handler(
            State(state.clone()),
            HeaderMap::new(),
            Json(LoginUrlRequest {
                return_url: "https://blog".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let anonymous = cookie_headers(&response);
        let body: LoginUrlResponse = body_json(response).await;
        assert!(body.url.contains("state=fixed-state"));

        let response = login_handler(
            State(state.clone()),
            anonymous.clone(),
            Json(LoginRequest {
                code: "good".to_string(),
                state: "fixed-state".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = cookie_headers(&response);
        assert_ne!(headers, anonymous);
        let body: UserResponse = body_json(response).await;
        assert_eq!(body.user.id, ALICE);
        assert_eq!(body.user.email, "a@b.com");
        assert_eq!(state.sessions.len(), 1);

        // The pre-login id no longer authenticates
        let result = me_handler(State(state.clone()), anonymous).await;
        assert!(matches!(result, Err(AuthError::NotLoggedIn)));

        let response = me_handler(State(state.clone()), headers.clone()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = logout_handler(State(state.clone()), headers.clone()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let result = me_handler(State(state), headers).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_state_mismatch() {
        let state = create_test_state();

        let response = login_url_handler(
            State(state.clone()),
            HeaderMap::new(),
            Json(LoginUrlRequest {
                return_url: "https://blog".to_string(),
            }),
        )
        .await;
        let headers = cookie_headers(&response);

        let response = login_handler(
            State(state),
            headers,
            Json(LoginRequest {
                code: "good".to_string(),
                state: "forged".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.code, "error_state");
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_login_url_when_logged_in() {
        let state = create_test_state();
        let handle = state.sessions.resolve(None, unix_now());
        handle.session.set(SESSION_USER_ID, ALICE.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("reaper_sid={}", handle.id)).unwrap(),
        );

        let response = login_url_handler(
            State(state),
            headers,
            Json(LoginUrlRequest {
                return_url: "https://blog".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.code, "already_login");
    }

    #[tokio::test]
    async fn test_cookieless_requests_open_no_session() {
        let state = create_test_state();

        for _ in 0..5 {
            let result = me_handler(State(state.clone()), HeaderMap::new()).await;
            assert!(matches!(result, Err(AuthError::NotLoggedIn)));

            let result = logout_handler(State(state.clone()), HeaderMap::new()).await;
            assert!(matches!(result, Err(AuthError::NotLoggedIn)));

            let response = login_handler(
                State(state.clone()),
                HeaderMap::new(),
                Json(LoginRequest {
                    code: "good".to_string(),
                    state: "fixed-state".to_string(),
                }),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(response.headers().get(header::SET_COOKIE).is_none());
        }

        let mut unknown = HeaderMap::new();
        unknown.insert(header::COOKIE, HeaderValue::from_static("reaper_sid=deadbeef"));
        assert!(me_handler(State(state.clone()), unknown).await.is_err());

        assert_eq!(state.sessions.len(), 0);
    }

    #[tokio::test]
    async fn test_logout_without_login() {
        let state = create_test_state();
        let result = logout_handler(State(state), HeaderMap::new()).await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
