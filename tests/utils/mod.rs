#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use campus_rooms::{app, AppState, InMemoryDbFacade};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Application wired to a fresh in-memory database
pub struct TestApp {
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(Arc::new(InMemoryDbFacade::new()));
        Self { router: app(state) }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        read(self.send(request).await).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.with_body("POST", uri, body).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.with_body("PUT", uri, body).await
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await.status()
    }

    async fn with_body(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        read(self.send(request).await).await
    }
}

/// Splits a response into its status and JSON body (`Null` when empty)
pub async fn read(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}
