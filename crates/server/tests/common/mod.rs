//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock catalog injected, enabling end-to-end testing of the search
//! flow without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use meeplelog_core::config::{DatabaseConfig, ServerConfig};
use meeplelog_core::{
    testing::{MockBoardGameCatalog, MockGameStore},
    BggConfig, Config, GameSearchService, GameStore, SqliteGameStore,
};

/// Re-export fixtures for test convenience
pub use meeplelog_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.add_record(fixtures::catan()).await;
///
///     let response = fixture.post("/api/v1/games/search", json!({ "query": "Catan" })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure search hits and detail records
    pub catalog: Arc<MockBoardGameCatalog>,
    /// Store behind the router
    pub store: Arc<dyn GameStore>,
    /// Set when the fixture was built with a mock store
    pub mock_store: Option<Arc<MockGameStore>>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture backed by a SQLite store in a temp directory.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let store: Arc<dyn GameStore> =
            Arc::new(SqliteGameStore::new(&db_path).expect("Failed to create game store"));
        Self::build(temp_dir, store, None)
    }

    /// Create a fixture backed by a controllable in-memory store.
    pub async fn with_mock_store() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mock = Arc::new(MockGameStore::new());
        let store: Arc<dyn GameStore> = mock.clone();
        Self::build(temp_dir, store, Some(mock))
    }

    fn build(
        temp_dir: TempDir,
        store: Arc<dyn GameStore>,
        mock_store: Option<Arc<MockGameStore>>,
    ) -> Self {
        let catalog = Arc::new(MockBoardGameCatalog::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: temp_dir.path().join("test.db"),
            },
            bgg: BggConfig::default(),
        };

        let search = GameSearchService::new(
            Arc::clone(&catalog) as Arc<dyn meeplelog_core::BoardGameCatalog>,
            Arc::clone(&store),
            config.bgg.max_results as usize,
        );

        let state = Arc::new(meeplelog_server::state::AppState::new(
            config,
            search,
            Arc::clone(&store),
        ));

        let router = meeplelog_server::api::create_router(state);

        Self {
            router,
            catalog,
            store,
            mock_store,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("POST", path, body, "application/json").await
    }

    /// Send a GET request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = self.send(request).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request with raw string body and custom content type.
    async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, body_bytes) = self.send(request).await;
        TestResponse {
            status,
            body: to_json(&body_bytes),
        }
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let (status, body_bytes) = self.send(request).await;
        TestResponse {
            status,
            body: to_json(&body_bytes),
        }
    }

    /// Send a prepared request and collect the raw response.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, axum::body::Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, body_bytes)
    }
}

fn to_json(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(bytes).unwrap_or(Value::Null)
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
