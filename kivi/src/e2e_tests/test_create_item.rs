//! Test creating items.

use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;
use crate::store::Store;

#[test]
fn test_create_item() {
    let test = TestApi::new();

    let (status, body) = test.post("fruit", "apple");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, ok("Item fruit created"));
    assert_eq!(test.store.get_item("fruit"), Ok("apple".to_string()));
}

#[test]
fn test_create_duplicate_item() {
    let test = TestApi::new();
    test.post("fruit", "apple");

    let (status, body) = test.post("fruit", "pear");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, failure("Item fruit already exists"));

    // First value wins
    assert_eq!(test.store.get_item("fruit"), Ok("apple".to_string()));
}

#[test]
fn test_create_empty_value() {
    let test = TestApi::new();

    let (status, _) = test.post("blank", "");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(test.store.get_item("blank"), Ok(String::new()));
}
