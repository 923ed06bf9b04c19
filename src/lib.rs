// ABOUTME: Main library entry point for the LiftLog fitness tracking API
// ABOUTME: Multi-tenant REST CRUD over exercise catalogue and per-user training records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

#![deny(unsafe_code)]

//! # LiftLog Server
//!
//! A REST API for tracking strength training. Reference data (exercise
//! types, muscle groups, muscle functions, equipment) is shared by every
//! user and maintained by administrators; exercise configuration, history
//! and workout sessions belong to the authenticated user and are never
//! visible to anyone else.
//!
//! ## Architecture
//!
//! - **Routes**: thin axum handlers that extract, authenticate and respond
//! - **Pipeline**: validation and logging stages around every use case
//! - **Use cases**: one per operation, generic over the entity repository
//! - **Database**: SQLite repositories on a shared filter/sort/page builder
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use liftlog_server::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     liftlog_server::server::run(config).await
//! }
//! ```

/// Bearer token verification
pub mod auth;

/// Configuration loaded from the environment
pub mod config;

/// Application constants and defaults
pub mod constants;

/// SQLite storage, query builder and repositories
pub mod database;

/// Structured logging setup
pub mod logging;

/// HTTP middleware: request ids and CORS
pub mod middleware;

/// Request pipeline and use-case contract
pub mod pipeline;

/// `HTTP` routes and handlers
pub mod routes;

/// Server assembly and lifecycle
pub mod server;

/// Application operations
pub mod use_cases;

/// Unified error handling with problem-details responses
pub use liftlog_core::errors;

/// Entity models and request inputs
pub use liftlog_core::models;

/// Query request and paged result envelope
pub use liftlog_core::pagination;

/// Field validation
pub use liftlog_core::validation;
