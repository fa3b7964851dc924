use crate::core::error::RosterError;
use crate::core::state::AppState;
use crate::models::api::{
    DrawQuery, DrawResponse, HistoryEntryView, PechvogelQuery, UserListResponse, UserView,
};
use crate::validation::params::parse_draw_count;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Draw winners among present, unpaused, non-blacklisted users
///
/// POST /draw?count=<n>
pub async fn draw_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DrawQuery>,
) -> Result<Response, RosterError> {
    let count = parse_draw_count(&params.count, state.config.draw.max_count)
        .map_err(|e| state.reject(e.into()))?;

    let now = Utc::now();
    let mut roster = state.roster();

    let outcome = roster
        .request_draw(count, now, &mut rand::rng())
        .map_err(|e| state.reject(e))?;

    state.metrics.record_draw(outcome.winners.len());
    info!(requested = count, drawn = outcome.winners.len(), "Draw served");

    let winners: Vec<UserView> = outcome
        .winners
        .iter()
        .map(|user| UserView::new(user, &roster, now))
        .collect();
    let history: Vec<HistoryEntryView> = outcome.history.into_iter().map(Into::into).collect();

    Ok((
        StatusCode::OK,
        Json(DrawResponse {
            success: true,
            winners,
            history,
        }),
    )
        .into_response())
}

/// Active candidates who have waited longest ("Pechvogel")
///
/// GET /pechvogel?count=<n>
pub async fn pechvogel_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PechvogelQuery>,
) -> Response {
    let n = params.count.unwrap_or(state.config.draw.pechvogel_count);
    let now = Utc::now();
    let roster = state.roster();

    let users = roster
        .pechvogel(n, now)
        .into_iter()
        .map(|user| UserView::new(user, &roster, now))
        .collect();

    (
        StatusCode::OK,
        Json(UserListResponse {
            success: true,
            users,
        }),
    )
        .into_response()
}
