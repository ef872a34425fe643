//! End-to-end tests at the HTTP handler level.
//!
//! Each test file covers a specific scenario, driving the handlers the way
//! the router would and checking both status code and envelope.

#![cfg(test)]

mod helpers;

mod test_create_item;
mod test_delete_item;
mod test_get_item;
mod test_missing_key;
mod test_serve_http;
mod test_update_item;
