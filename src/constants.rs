// ABOUTME: Server-level constants for LiftLog: service identity, headers and defaults
// ABOUTME: Environment variable names and fallback values used by configuration loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # Constants Module
//!
//! Hardcoded values the server needs outside of configuration. Entity limits
//! live in `liftlog_core::constants`.

/// Service identity used in logs
pub mod service_names {
    /// Name reported by the server binary
    pub const LIFTLOG_SERVER: &str = "liftlog-server";
}

/// HTTP header names
pub mod headers {
    /// Request correlation header, honoured when present and echoed back
    pub const REQUEST_ID: &str = "x-request-id";
}

/// Defaults applied when the environment does not override them
pub mod defaults {
    /// Interface the HTTP listener binds to
    pub const HOST: &str = "127.0.0.1";
    /// HTTP listener port
    pub const HTTP_PORT: u16 = 8081;
    /// SQLite database location
    pub const DATABASE_URL: &str = "sqlite:./data/liftlog.db";
    /// Connection pool size for file databases
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    /// Role claim value that grants reference-data writes
    pub const ADMIN_ROLE: &str = "admin";
    /// Claim carrying the caller's roles
    pub const ROLES_CLAIM: &str = "roles";
    /// Seconds before an in-flight request is abandoned
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Largest accepted request body
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;
    /// Use-case executions slower than this are logged at warn
    pub const SLOW_REQUEST_THRESHOLD_MS: u64 = 500;
    /// Allowed CORS origins
    pub const CORS_ORIGINS: &str = "*";
    /// Clock skew tolerated when checking token expiry
    pub const JWT_LEEWAY_SECS: u64 = 30;
}

/// Public names of the resources exposed over HTTP
pub mod resources {
    /// Exercise types
    pub const EXERCISE_TYPE: &str = "Exercise type";
    /// Muscle groups
    pub const MUSCLE_GROUP: &str = "Muscle group";
    /// Muscle functions
    pub const MUSCLE_FUNCTION: &str = "Muscle function";
    /// Equipment groups
    pub const EQUIPMENT_GROUP: &str = "Equipment group";
    /// Equipment
    pub const EQUIPMENT: &str = "Equipment";
    /// Exercise/muscle group links
    pub const EXERCISE_MUSCLE_GROUP: &str = "Exercise muscle group";
    /// Per-user exercise configuration
    pub const USER_EXERCISE: &str = "User exercise";
    /// Performed exercise entries
    pub const USER_EXERCISE_HISTORY: &str = "User exercise history";
    /// Workout sessions
    pub const WORKOUT_SESSION: &str = "Workout session";
    /// Users
    pub const USER: &str = "User";
}
