// ABOUTME: Unauthenticated health check for load balancers and monitoring
// ABOUTME: Reports healthy only when the database answers a trivial query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::warn;

use super::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Response {
        let timestamp = chrono::Utc::now().to_rfc3339();
        match resources.database.ping().await {
            Ok(()) => (
                StatusCode::OK,
                Json(json!({
                    "status": "healthy",
                    "database": "ok",
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": timestamp,
                })),
            )
                .into_response(),
            Err(error) => {
                warn!(error = %error, "Health check failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "status": "unhealthy",
                        "database": "unavailable",
                        "version": env!("CARGO_PKG_VERSION"),
                        "timestamp": timestamp,
                    })),
                )
                    .into_response()
            }
        }
    }
}
