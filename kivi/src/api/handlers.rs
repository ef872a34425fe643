//! Request handlers for `/items`.
//!
//! Each handler maps one store operation onto a status code and an
//! [`ApiResponse`] envelope. Bodies that are not valid UTF-8 are rejected by
//! the `String` extractor before a handler runs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::{ApiResponse, AppState};
use crate::store::StoreError;

type HandlerResponse = (StatusCode, Json<ApiResponse>);

/// `POST /items/{key}`
pub async fn create_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
    value: String,
) -> HandlerResponse {
    tracing::debug!(key = %key, "create item");
    match state.store.create_item(&key, value) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(format!("Item {key} created"))),
        ),
        Err(e) => error_response(&e),
    }
}

/// `GET /items/{key}`
pub async fn get_item(State(state): State<AppState>, Path(key): Path<String>) -> HandlerResponse {
    tracing::debug!(key = %key, "get item");
    match state.store.get_item(&key) {
        Ok(value) => (
            StatusCode::OK,
            Json(ApiResponse::with_payload("Value for key found", value)),
        ),
        Err(e) => error_response(&e),
    }
}

/// `PUT /items/{key}`
pub async fn update_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
    value: String,
) -> HandlerResponse {
    tracing::debug!(key = %key, "update item");
    match state.store.update_item(&key, value) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(format!("Item {key} updated"))),
        ),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /items/{key}`
pub async fn delete_item(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> HandlerResponse {
    tracing::debug!(key = %key, "delete item");
    match state.store.delete_item(&key) {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(format!("Item {key} deleted"))),
        ),
        Err(e) => error_response(&e),
    }
}

/// Any method on `/items/` without a key.
pub async fn missing_key() -> HandlerResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::failure("Key expected")),
    )
}

fn error_response(error: &StoreError) -> HandlerResponse {
    let (status, message) = match error {
        StoreError::AlreadyExists(key) => {
            (StatusCode::BAD_REQUEST, format!("Item {key} already exists"))
        }
        StoreError::NotFound(key) => (StatusCode::NOT_FOUND, format!("Item {key} not found")),
        StoreError::LockPoisoned => {
            tracing::error!("store lock poisoned");
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    };
    (status, Json(ApiResponse::failure(message)))
}
