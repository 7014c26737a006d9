//! API integration tests

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use booklib_server::{api, repository::SqliteRepository, server, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// A server on an ephemeral port backed by a fresh SQLite file
struct TestServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let repository = SqliteRepository::connect(dir.path().join("storage.db"))
            .await
            .expect("Failed to open storage");
        let app = api::create_router(AppState::new(Arc::new(repository)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr: SocketAddr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server::serve(listener, app, async move {
            let _ = rx.await;
        }));

        Self {
            base_url: format!("http://{}/api/v1", addr),
            shutdown: Some(tx),
            handle,
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let result = (&mut self.handle).await.expect("Server task panicked");
        assert!(result.is_ok());
    }
}

async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response")
}

fn moby_dick() -> Value {
    json!({
        "book_name": "Moby Dick",
        "author": "Melville",
        "publication_date": "1851-10-18",
        "price": 12.5
    })
}

#[tokio::test]
async fn test_book_lifecycle() {
    let server = TestServer::start().await;
    let client = Client::new();

    // Create
    let response = client
        .post(server.url("/books"))
        .json(&moby_dick())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()["content-type"],
        "application/json"
    );
    assert_eq!(json_body(response).await, json!({"book_id": 1}));

    // Read back
    let response = client
        .get(server.url("/books/1"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "id": 1,
            "book_name": "Moby Dick",
            "author": "Melville",
            "publication_date": "1851-10-18",
            "price": 12.5
        })
    );

    // Update
    let response = client
        .put(server.url("/books/1"))
        .json(&json!({
            "book_name": "Moby-Dick",
            "author": "Herman Melville",
            "publication_date": "1851-10-18",
            "price": 13
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"message": "1 book updated"}));

    let response = client
        .get(server.url("/books/1"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(
        json_body(response).await,
        json!({
            "id": 1,
            "book_name": "Moby-Dick",
            "author": "Herman Melville",
            "publication_date": "1851-10-18",
            "price": 13
        })
    );

    // Delete
    let response = client
        .delete(server.url("/books/1"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"rows_deleted": 1}));

    let response = client
        .get(server.url("/books/1"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["status"], "Error");
    assert_eq!(body["error"], "book not found with id=1");

    let response = client
        .get(server.url("/books"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));

    server.stop().await;
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .post(server.url("/books"))
        .json(&json!({"book_name": "", "author": "X", "publication_date": "2000", "price": 1}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({"status": "Error", "error": "field Name is required"})
    );

    let response = client
        .post(server.url("/books"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"status": "Error", "error": "empty body"})
    );

    // Nothing was stored
    let response = client
        .get(server.url("/books"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(json_body(response).await, json!([]));

    server.stop().await;
}

#[tokio::test]
async fn test_ids_unique_and_list_stable() {
    let server = TestServer::start().await;
    let client = Client::new();

    let mut ids = HashSet::new();
    for _ in 0..3 {
        let response = client
            .post(server.url("/books"))
            .json(&moby_dick())
            .send()
            .await
            .expect("Failed to send request");
        ids.insert(json_body(response).await["book_id"].as_i64().unwrap());
    }
    assert_eq!(ids.len(), 3);

    let first = json_body(client.get(server.url("/books")).send().await.unwrap()).await;
    let second = json_body(client.get(server.url("/books")).send().await.unwrap()).await;
    assert_eq!(first, second);
    assert_eq!(first.as_array().unwrap().len(), 3);

    // Deleting an absent id reports zero rows
    let response = client
        .delete(server.url("/books/999"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"rows_deleted": 0}));

    server.stop().await;
}

#[tokio::test]
async fn test_update_unknown_book() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .put(server.url("/books/42"))
        .json(&moby_dick())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"status": "Error", "error": "book not found with id=42"})
    );

    server.stop().await;
}
