// ABOUTME: HTTP server assembly: middleware stack, listener and graceful shutdown
// ABOUTME: Wires the database, token verifier and pipeline into the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use http::StatusCode;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};

use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::{
    layer_rejection_middleware, request_id_middleware, setup_cors, RequestId,
};
use crate::routes::{api_routes, ServerResources};

/// The full application: routes plus the HTTP middleware stack
///
/// Outermost first: request id, tracing, CORS, problem details for layer
/// rejections, timeout, body limit.
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let http = &resources.config.http;
    api_routes(resources)
        .layer(RequestBodyLimitLayer::new(http.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(http.request_timeout_secs),
        ))
        .layer(middleware::from_fn(layer_rejection_middleware))
        .layer(setup_cors(http))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(middleware::from_fn(request_id_middleware))
}

/// Connect the database and serve the API until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the database, verification key or listener cannot be
/// set up, or the server fails while running
pub async fn run(config: ServerConfig) -> Result<()> {
    let database = Database::connect(&config.database)
        .await
        .context("Failed to initialize database")?;
    let config = Arc::new(config);
    let resources = Arc::new(
        ServerResources::new(database, config.clone())
            .context("Failed to initialize token verification")?,
    );
    let app = build_router(&resources);

    let address = format!("{}:{}", config.host, config.http_port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {address}"))?;
    info!(address = %address, "LiftLog API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(error = %error, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(error = %error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
