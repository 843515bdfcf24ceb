use crate::core::error::AdminError;
use crate::core::state::AppState;
use crate::models::auth::{
    SuccessResponse, UserAddQuery, UserGetQuery, UserRecordResponse, UserTokenQuery,
};
use crate::utils::auth::verify_api_key;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

fn check_api_key(state: &AppState, provided: &str, action: &str) -> Result<(), AdminError> {
    if verify_api_key(provided, &state.config.admin.api_key) {
        Ok(())
    } else {
        warn!(action = action, "Unauthorized admin request");
        Err(AdminError::InvalidApiKey)
    }
}

/// Fetch a full user record, token included
///
/// GET /user/get?api_key=<key>&id=<id>
pub async fn user_get_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserGetQuery>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "user_get")?;

    let user = state.users.get_by_id(&params.id)?;

    Ok((
        StatusCode::OK,
        Json(UserRecordResponse {
            success: true,
            user,
        }),
    )
        .into_response())
}

/// Create (or overwrite) a user record
///
/// GET /user/add?api_key=<key>&id=<id>&token=<token>&email=<email>&name=..&avatar=..&bio=..&gender=..
pub async fn user_add_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserAddQuery>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "user_add")?;

    let record = state
        .users
        .create(&params.id, &params.token, &params.email, params.info())?;

    info!(user_id = %record.id, email = %record.email, "User added");

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "User added successfully".to_string(),
        }),
    )
        .into_response())
}

/// Replace a user's access token
///
/// GET /user/token?api_key=<key>&id=<id>&token=<token>
pub async fn user_token_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserTokenQuery>,
) -> Result<Response, AdminError> {
    check_api_key(&state, &params.api_key, "user_token")?;

    state.users.set_token(&params.id, &params.token)?;

    info!(user_id = %params.id, "User token updated");

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Token updated successfully".to_string(),
        }),
    )
        .into_response())
}
