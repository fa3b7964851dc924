use crate::core::state::AppState;
use crate::models::api::{HistoryEntryView, HistoryResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Past draws, newest first
///
/// GET /history
pub async fn history_handler(State(state): State<Arc<AppState>>) -> Response {
    let history: Vec<HistoryEntryView> = state
        .roster()
        .history()
        .into_iter()
        .map(Into::into)
        .collect();

    (
        StatusCode::OK,
        Json(HistoryResponse {
            success: true,
            history,
        }),
    )
        .into_response()
}
