// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::handlers::health::health_handler))
        .route("/stats", get(crate::handlers::stats::stats_handler))

        // Registry
        .route(
            "/users",
            get(crate::handlers::users::list_users_handler)
                .post(crate::handlers::users::add_user_handler),
        )
        .route("/users/bulk", post(crate::handlers::users::bulk_add_handler))
        .route("/users/{id}", delete(crate::handlers::users::delete_user_handler))

        // Presence and status
        .route("/users/{id}/presence", post(crate::handlers::presence::toggle_presence_handler))
        .route("/users/{id}/pause", post(crate::handlers::presence::toggle_pause_handler))
        .route("/users/{id}/blacklist", post(crate::handlers::presence::toggle_blacklist_handler))
        .route("/presence/clear", post(crate::handlers::presence::clear_presence_handler))

        // Draw and history
        .route("/draw", post(crate::handlers::draw::draw_handler))
        .route("/pechvogel", get(crate::handlers::draw::pechvogel_handler))
        .route("/history", get(crate::handlers::history::history_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
