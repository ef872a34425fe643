//! Test deleting items.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;

#[test]
fn test_delete_existing_item() {
    let test = TestApi::new();
    test.post("fruit", "apple");

    let (status, body) = test.delete("fruit");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ok("Item fruit deleted"));

    let (status, _) = test.get("fruit");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn test_delete_missing_item() {
    let test = TestApi::new();

    let (status, body) = test.delete("fruit");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, failure("Item fruit not found"));
}

#[test]
fn test_recreate_after_delete() {
    let test = TestApi::new();
    test.post("fruit", "apple");
    test.delete("fruit");

    let (status, _) = test.post("fruit", "pear");
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = test.get("fruit");
    assert_eq!(body.payload, serde_json::json!("pear"));
}
