//! Test requests without a key.

use axum::Json;
use axum::http::StatusCode;

use crate::api;
use crate::e2e_tests::helpers::*;

#[test]
fn test_missing_key() {
    let test = TestApi::new();

    let (status, Json(body)) = test.runtime.block_on(api::missing_key());
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("Key expected"));
}
