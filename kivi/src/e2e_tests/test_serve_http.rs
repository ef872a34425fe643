//! Test the router over a real TCP connection.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::api::{self, ApiResponse};
use crate::e2e_tests::helpers::*;
use crate::store::Store;

/// Send one raw HTTP/1.1 request and return (status line, body).
async fn send(addr: std::net::SocketAddr, request: String) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.expect("read response");

    let status_line = raw.lines().next().unwrap_or_default().to_string();
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status_line, body)
}

fn request(method: &str, path: &str, body: &str) -> String {
    format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[test]
fn test_serve_items_over_http() {
    let test = TestApi::new();
    let app = api::router(test.state.clone());

    test.runtime.block_on(async {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let (status, body) = send(addr, request("POST", "/items/fruit", "apple")).await;
        assert!(status.starts_with("HTTP/1.1 201"), "{status}");
        let parsed: ApiResponse = serde_json::from_str(&body).expect("json body");
        assert_eq!(parsed, ok("Item fruit created"));

        let (status, body) = send(addr, request("GET", "/items/fruit", "")).await;
        assert!(status.starts_with("HTTP/1.1 200"), "{status}");
        let parsed: ApiResponse = serde_json::from_str(&body).expect("json body");
        assert_eq!(parsed.payload, serde_json::json!("apple"));

        let (status, _) = send(addr, request("GET", "/items/", "")).await;
        assert!(status.starts_with("HTTP/1.1 400"), "{status}");

        let (status, _) = send(addr, request("PATCH", "/items/fruit", "x")).await;
        assert!(status.starts_with("HTTP/1.1 405"), "{status}");
    });
}

#[test]
fn test_serve_nested_key_over_http() {
    let test = TestApi::new();
    let app = api::router(test.state.clone());

    test.runtime.block_on(async {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let (status, body) = send(addr, request("POST", "/items/a/b", "nested")).await;
        assert!(status.starts_with("HTTP/1.1 201"), "{status}");
        let parsed: ApiResponse = serde_json::from_str(&body).expect("json body");
        assert_eq!(parsed, ok("Item a/b created"));

        let (status, body) = send(addr, request("GET", "/items/a/b", "")).await;
        assert!(status.starts_with("HTTP/1.1 200"), "{status}");
        let parsed: ApiResponse = serde_json::from_str(&body).expect("json body");
        assert_eq!(parsed.payload, serde_json::json!("nested"));

        let (status, _) = send(addr, request("GET", "/items/a", "")).await;
        assert!(status.starts_with("HTTP/1.1 404"), "{status}");
    });

    assert_eq!(test.store.get_item("a/b"), Ok("nested".to_string()));
}
