// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration loaded at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! Configuration module for the LiftLog server
//!
//! All settings come from environment variables; the binary may override the
//! listen port and database location from the command line.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, HttpConfig, JwtAlgorithm,
    PipelineConfig, ServerConfig,
};
