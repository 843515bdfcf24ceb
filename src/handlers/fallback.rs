use crate::models::auth::ErrorResponse;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};

pub async fn fallback_handler(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: format!("No route for {}", uri.path()),
            code: "not_found".to_string(),
        }),
    )
        .into_response()
}
