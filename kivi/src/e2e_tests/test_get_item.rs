//! Test reading items.

use axum::http::StatusCode;
use serde_json::Value;

use crate::api::ApiResponse;
use crate::e2e_tests::helpers::*;

#[test]
fn test_get_existing_item() {
    let test = TestApi::new();
    test.post("fruit", "apple");

    let (status, body) = test.get("fruit");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        ApiResponse::with_payload("Value for key found", "apple")
    );
}

#[test]
fn test_get_missing_item() {
    let test = TestApi::new();

    let (status, body) = test.get("nothing");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, failure("Item nothing not found"));
    assert_eq!(body.payload, Value::Null);
}

#[test]
fn test_many_items() {
    let test = TestApi::new();

    for i in 0..100 {
        let (status, _) = test.post(&format!("key-{i}"), &format!("value-{i}"));
        assert_eq!(status, StatusCode::CREATED);
    }

    for i in 0..100 {
        let (status, body) = test.get(&format!("key-{i}"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.payload, Value::String(format!("value-{i}")));
    }
    assert_eq!(test.store.len(), Ok(100));
}
