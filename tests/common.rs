// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, token minting and router helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `liftlog_server`

use std::sync::{Arc, Once};

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use liftlog_server::config::{DatabaseUrl, ServerConfig};
use liftlog_server::database::Database;
use liftlog_server::models::User;
use liftlog_server::pipeline::RequestContext;
use liftlog_server::routes::ServerResources;
use liftlog_server::server::build_router;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Shared secret the test configuration verifies HS256 tokens with
pub const TEST_JWT_SECRET: &str = "liftlog-integration-test-secret";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointing at a private in-memory database
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.database.url = DatabaseUrl::Memory;
    config.database.max_connections = 1;
    config.auth.jwt_secret = Some(TEST_JWT_SECRET.to_owned());
    config
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::in_memory().await.expect("in-memory database")
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::new(database, Arc::new(test_config())).expect("resources"))
}

/// Sign an HS256 token for `subject` carrying `roles`
pub fn mint_token(subject: &str, roles: &[&str]) -> String {
    mint_token_with(json!({
        "sub": subject,
        "email": format!("{subject}@example.com"),
        "name": format!("Test {subject}"),
        "roles": roles,
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    }))
}

/// Sign arbitrary claims with the test secret
pub fn mint_token_with(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token")
}

/// A provisioned caller and the context use cases run under
pub async fn create_test_context(
    database: &Database,
    subject: &str,
    is_admin: bool,
) -> RequestContext {
    let principal = liftlog_server::auth::Principal {
        subject: subject.to_owned(),
        email: Some(format!("{subject}@example.com")),
        name: None,
        is_admin,
    };
    let user: User = database.users().provision(&principal).await.expect("user");
    RequestContext {
        request_id: format!("test-{subject}"),
        user,
        is_admin,
    }
}

/// Router plus helpers for issuing requests against it
pub struct TestApp {
    /// Complete application router
    pub router: Router,
    /// Resources the router was built from
    pub resources: Arc<ServerResources>,
}

impl TestApp {
    /// Application over a fresh in-memory database
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Application over a fresh in-memory database with custom settings
    pub async fn with_config(config: ServerConfig) -> Self {
        let database = create_test_database().await;
        let resources =
            Arc::new(ServerResources::new(database, Arc::new(config)).expect("resources"));
        let router = build_router(&resources);
        Self { router, resources }
    }

    /// Send a request and decode the JSON response body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// GET with a bearer token
    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    /// POST a JSON body with a bearer token
    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    /// PUT a JSON body with a bearer token
    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// DELETE with a bearer token
    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, Some(token), None).await
    }
}
