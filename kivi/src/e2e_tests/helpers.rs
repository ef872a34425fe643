//! Common helpers for end-to-end tests.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::{self, ApiResponse, AppState};
use crate::store::{InMemoryStore, Store};

/// A fresh store behind the handlers, plus a runtime to drive them.
pub struct TestApi {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub runtime: tokio::runtime::Runtime,
}

impl TestApi {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let shared: Arc<dyn Store> = store.clone();
        let state = AppState::new(shared);

        #[allow(clippy::expect_used)]
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");

        Self {
            state,
            store,
            runtime,
        }
    }

    pub fn post(&self, key: &str, body: &str) -> (StatusCode, ApiResponse) {
        let call = api::create_item(
            State(self.state.clone()),
            Path(key.to_string()),
            body.to_string(),
        );
        into_parts(self.runtime.block_on(call))
    }

    pub fn get(&self, key: &str) -> (StatusCode, ApiResponse) {
        let call = api::get_item(State(self.state.clone()), Path(key.to_string()));
        into_parts(self.runtime.block_on(call))
    }

    pub fn put(&self, key: &str, body: &str) -> (StatusCode, ApiResponse) {
        let call = api::update_item(
            State(self.state.clone()),
            Path(key.to_string()),
            body.to_string(),
        );
        into_parts(self.runtime.block_on(call))
    }

    pub fn delete(&self, key: &str) -> (StatusCode, ApiResponse) {
        let call = api::delete_item(State(self.state.clone()), Path(key.to_string()));
        into_parts(self.runtime.block_on(call))
    }
}

fn into_parts((status, Json(body)): (StatusCode, Json<ApiResponse>)) -> (StatusCode, ApiResponse) {
    (status, body)
}

/// Envelope for a successful call without payload.
pub fn ok(message: &str) -> ApiResponse {
    ApiResponse::ok(message)
}

/// Envelope for a failed call.
pub fn failure(message: &str) -> ApiResponse {
    ApiResponse::failure(message)
}
