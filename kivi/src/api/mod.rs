//! HTTP front end for the key/value store.
//!
//! Routes:
//! - `POST /items/{key}`: create an item; the request body is the value
//! - `GET /items/{key}`: read an item
//! - `PUT /items/{key}`: replace an item's value
//! - `DELETE /items/{key}`: remove an item
//!
//! The key is everything after `/items/`, slashes included.
//!
//! Every response body is an [`ApiResponse`] envelope.

mod handlers;
mod response;

use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};

use crate::store::Store;

pub use handlers::{create_item, delete_item, get_item, missing_key, update_item};
pub use response::ApiResponse;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The store backing `/items`. Constructed by the caller, never global.
    pub store: Arc<dyn Store>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

/// Build the router serving `/items`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/items/", any(missing_key))
        .route(
            "/items/{*key}",
            get(get_item)
                .post(create_item)
                .put(update_item)
                .delete(delete_item),
        )
        .with_state(state)
}
