use crate::core::error::RosterError;
use crate::core::state::AppState;
use crate::models::api::{SuccessResponse, ToggleResponse, UserView};
use crate::stores::roster::Roster;
use crate::validation::params::parse_user_id;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Run a toggle against the roster and answer with the user's new state
fn toggle<F>(state: &AppState, raw_id: &str, op: F) -> Result<Response, RosterError>
where
    F: FnOnce(&mut Roster, Uuid) -> Result<bool, RosterError>,
{
    let id = parse_user_id(raw_id).map_err(|e| state.reject(e.into()))?;

    let mut roster = state.roster();
    op(&mut *roster, id).map_err(|e| state.reject(e))?;

    let user = roster.user(id).ok_or(RosterError::NotFound(id))?;
    let view = UserView::new(user, &roster, Utc::now());

    Ok((
        StatusCode::OK,
        Json(ToggleResponse {
            success: true,
            user: view,
        }),
    )
        .into_response())
}

/// Mark a user present or absent
///
/// POST /users/{id}/presence
pub async fn toggle_presence_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, RosterError> {
    toggle(&state, &id, Roster::toggle_presence)
}

/// Pause or resume a present user
///
/// POST /users/{id}/pause
pub async fn toggle_pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, RosterError> {
    toggle(&state, &id, Roster::toggle_pause)
}

/// POST /users/{id}/blacklist
pub async fn toggle_blacklist_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, RosterError> {
    toggle(&state, &id, Roster::toggle_blacklist)
}

/// Mark everyone absent
///
/// POST /presence/clear
pub async fn clear_presence_handler(State(state): State<Arc<AppState>>) -> Response {
    state.roster().clear_presence();

    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: "Presence cleared".to_string(),
        }),
    )
        .into_response()
}
