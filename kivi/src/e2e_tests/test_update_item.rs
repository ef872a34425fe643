//! Test updating items.

use axum::http::StatusCode;
use serde_json::Value;

use crate::e2e_tests::helpers::*;

#[test]
fn test_update_existing_item() {
    let test = TestApi::new();
    test.post("fruit", "apple");

    let (status, body) = test.put("fruit", "pear");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ok("Item fruit updated"));

    let (_, body) = test.get("fruit");
    assert_eq!(body.payload, Value::String("pear".to_string()));
}

#[test]
fn test_update_missing_item() {
    let test = TestApi::new();

    let (status, body) = test.put("fruit", "pear");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, failure("Item fruit not found"));

    // Update never creates
    let (status, _) = test.get("fruit");
    assert_eq!(status, StatusCode::NOT_FOUND);
}
