#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
// Life of a request:
// 1. HTTP request arrives at /items/{key}
// 2. Handler calls the matching Store operation
// 3. Result is wrapped in the JSON envelope with a status code
//
// System components:
//  - B-tree index (in-memory, insert-only)
//  - Key/value store
//  - HTTP front end

pub mod api;
pub mod btree;
pub mod config;
pub mod store;

mod e2e_tests;
