use crate::core::config::Config;
use crate::core::state::AppState;
use crate::persistence::snapshot::SnapshotStore;
use crate::stores::roster::Roster;
use axum::response::Response;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tempfile::TempDir;

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.draw.max_count = 10;
    config.draw.pechvogel_count = 2;
    config
}

/// State backed by a temp directory; keep the `TempDir` alive for the test
pub fn create_test_state() -> (Arc<AppState>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(temp_dir.path().join("data.json"));
    let state = AppState::new(create_test_config(), Roster::default(), store);
    (Arc::new(state), temp_dir)
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
