use crate::models::api::ErrorResponse;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};

pub async fn fallback_handler(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "Unknown endpoint");

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: format!("Unknown endpoint: {}", uri.path()),
        }),
    )
        .into_response()
}
