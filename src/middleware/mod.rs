// ABOUTME: HTTP middleware for request correlation and cross-origin access
// ABOUTME: Provides request IDs, the CORS layer and problem details for layer rejections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

/// CORS configuration
pub mod cors;
/// Problem details for rejections produced by tower-http layers
pub mod problem;
/// Request correlation identifiers
pub mod request_id;

pub use cors::setup_cors;
pub use problem::layer_rejection_middleware;
pub use request_id::{request_id_middleware, RequestId};
