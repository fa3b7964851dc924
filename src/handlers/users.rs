use crate::core::error::RosterError;
use crate::core::state::AppState;
use crate::models::api::{
    BulkImportResponse, NewUserRequest, SearchQuery, SuccessResponse, UserListResponse,
    UserResponse, UserView,
};
use crate::validation::params::parse_user_id;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use std::sync::Arc;

/// List users in display order, optionally filtered
///
/// GET /users?search=<text>
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let now = Utc::now();
    let roster = state.roster();

    let users = roster
        .registry()
        .search(&params.search)
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

/// Create a user
///
/// POST /users  {"first_name": "...", "last_name": "..."}
pub async fn add_user_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewUserRequest>,
) -> Result<Response, RosterError> {
    let mut roster = state.roster();

    let user = roster
        .add_user(&request.first_name, &request.last_name)
        .map_err(|e| state.reject(e))?;
    let view = UserView::new(&user, &roster, Utc::now());

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            user: view,
        }),
    )
        .into_response())
}

/// Import users from plain text, one "first [last]" per line
///
/// POST /users/bulk
pub async fn bulk_add_handler(State(state): State<Arc<AppState>>, body: String) -> Response {
    let report = state.roster().bulk_add(body.lines());

    (
        StatusCode::OK,
        Json(BulkImportResponse {
            success: true,
            added: report.added,
            skipped: report.skipped,
        }),
    )
        .into_response()
}

/// Delete a user
///
/// DELETE /users/{id}
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, RosterError> {
    let id = parse_user_id(&id).map_err(|e| state.reject(e.into()))?;

    let user = state.roster().delete_user(id).map_err(|e| state.reject(e))?;

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: format!("User '{}' deleted", user.display_name()),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{create_test_state, read_json};

    #[tokio::test]
    async fn test_add_user_success() {
        let (state, _dir) = create_test_state();

        let request = NewUserRequest {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
        };

        let response = add_user_handler(State(state.clone()), Json(request)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: UserResponse = read_json(response).await;
        assert_eq!(body.user.display_name, "Alice Smith");
        assert_eq!(body.user.total_games, 0);
        assert!(body.user.last_played.is_none());
        assert_eq!(state.roster().registry().len(), 1);
    }

    #[tokio::test]
    async fn test_add_user_empty_first_name() {
        let (state, _dir) = create_test_state();

        let request = NewUserRequest {
            first_name: "  ".to_string(),
            last_name: "Smith".to_string(),
        };

        let result = add_user_handler(State(state.clone()), Json(request)).await;
        assert!(result.is_err());
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.roster().registry().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_add() {
        let (state, _dir) = create_test_state();

        let body = "Alice Smith\nAlice Smith\n\nBob\n".to_string();
        let response = bulk_add_handler(State(state.clone()), body).await;
        assert_eq!(response.status(), StatusCode::OK);

        let report: BulkImportResponse = read_json(response).await;
        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(state.roster().registry().len(), 2);
    }

    #[tokio::test]
    async fn test_list_users_sorted_and_filtered() {
        let (state, _dir) = create_test_state();
        state.roster().bulk_add(["carol Jones", "Alice Smith", "bob Smithers"]);

        let response = list_users_handler(
            State(state.clone()),
            Query(SearchQuery {
                search: String::new(),
            }),
        )
        .await;
        let body: UserListResponse = read_json(response).await;
        let names: Vec<&str> = body.users.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alice Smith", "bob Smithers", "carol Jones"]);

        let response = list_users_handler(
            State(state),
            Query(SearchQuery {
                search: "smith".to_string(),
            }),
        )
        .await;
        let body: UserListResponse = read_json(response).await;
        assert_eq!(body.users.len(), 2);
    }

    #[tokio::test]
    async fn test_list_users_shows_session_state() {
        let (state, _dir) = create_test_state();
        let id = state.roster().add_user("Alice", "").unwrap().id;
        state.roster().toggle_presence(id).unwrap();
        state.roster().toggle_pause(id).unwrap();

        let response = list_users_handler(
            State(state),
            Query(SearchQuery {
                search: String::new(),
            }),
        )
        .await;
        let body: UserListResponse = read_json(response).await;

        assert!(body.users[0].is_present);
        assert!(body.users[0].is_paused);
        assert_eq!(body.users[0].days_waiting, 999);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (state, _dir) = create_test_state();
        let id = state.roster().add_user("Alice", "").unwrap().id;
        state.roster().toggle_presence(id).unwrap();

        let response = delete_user_handler(State(state.clone()), Path(id.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let roster = state.roster();
        assert!(roster.user(id).is_none());
        assert!(!roster.is_present(id));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let (state, _dir) = create_test_state();

        let result =
            delete_user_handler(State(state.clone()), Path(uuid::Uuid::new_v4().to_string())).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user_malformed_id() {
        let (state, _dir) = create_test_state();

        let result = delete_user_handler(State(state), Path("nope".to_string())).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
