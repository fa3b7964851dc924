// Stats endpoint

use crate::core::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Returns JSON with session statistics:
/// - Draws performed, players drawn, rejected requests
/// - Users, present, paused, blacklisted and eligible counts
/// - History length and uptime
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.metrics.get_snapshot(&state.roster());

    (StatusCode::OK, Json(snapshot)).into_response()
}
