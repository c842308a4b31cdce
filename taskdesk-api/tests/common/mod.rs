//! Common test utilities for integration tests
//!
//! Each [`TestContext`] owns a fresh in-memory store and a router built over
//! it, so tests never share state. Requests go through
//! `tower::ServiceExt::oneshot` without opening a socket.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use taskdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskdesk_shared::{auth::jwt::TokenIssuer, store::memory::MemoryStore};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context over an empty store with a fast hashing work factor
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self { store, app, config }
    }

    /// Issuer sharing the server's secret
    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(self.config.jwt.secret.clone(), self.config.jwt.expiration_hours)
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request and returns the status and parsed JSON body
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };

        (status, json)
    }

    /// Registers an account and returns its token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);

        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a task and returns the response body
    pub async fn create_task(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/tasks",
                Some(token),
                Some(serde_json::json!({ "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);

        body
    }
}

/// Configuration used by every integration test
pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("memory:".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "PASSWORD_HASH_MEMORY_KIB" => Some("1024".to_string()),
        "PASSWORD_HASH_ITERATIONS" => Some("1".to_string()),
        "PASSWORD_HASH_PARALLELISM" => Some("1".to_string()),
        _ => None,
    })
    .unwrap()
}
