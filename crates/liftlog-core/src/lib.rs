// ABOUTME: Core types for the LiftLog fitness tracking API
// ABOUTME: Foundation crate with error handling, query/paging model, validation and entities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

#![deny(unsafe_code)]

//! # LiftLog Core
//!
//! Foundation crate providing the types shared between the storage layer,
//! the request pipeline and the HTTP surface. It has no runtime and changes
//! infrequently, which keeps incremental builds of the server crate fast.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, field errors and problem details
//! - **pagination**: `QueryRequest` and `PagedResult`
//! - **validation**: the `Validate` trait and field rule helpers
//! - **models**: reference and user-owned entities with their inputs
//! - **constants**: paging bounds and field limits

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Paging bounds, text limits and training ranges
pub mod constants;

/// Search, sort and page description for collection queries
pub mod pagination;

/// Field-level validation rules
pub mod validation;

/// Entity models and their create/update inputs
pub mod models;
