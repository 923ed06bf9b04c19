// ABOUTME: Unified error type, error codes and problem-details rendering for LiftLog
// ABOUTME: Classifies storage failures and maps every error code to an HTTP status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # Unified Error Handling
//!
//! Every operation in the service returns [`AppResult`]. Failures carry a
//! machine-readable [`ErrorCode`], a human-readable message, optional
//! field-level validation errors and the request id they occurred under.
//! The HTTP layer renders them as RFC 7807 problem details.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No credentials were supplied
    AuthRequired,
    /// Credentials were supplied but could not be verified
    AuthInvalid,
    /// Credentials were valid but have expired
    AuthExpired,
    /// Caller is authenticated but not allowed to perform the action
    PermissionDenied,

    // Validation
    /// Request could not be parsed (malformed JSON, bad query string, bad id)
    InvalidInput,
    /// Request parsed but failed one or more field rules
    ValidationFailed,
    /// Request references another entity that does not exist
    InvalidReference,

    // Resources
    /// Requested entity does not exist in the caller's scope
    ResourceNotFound,
    /// A unique index rejected the write
    ResourceAlreadyExists,
    /// The supplied concurrency stamp no longer matches the stored row
    ConcurrencyConflict,
    /// Entity is still referenced by other rows and cannot be deleted
    ResourceInUse,

    // Transport
    /// The request did not complete within the configured timeout
    RequestTimeout,
    /// The request body exceeds the configured size limit
    PayloadTooLarge,

    // Internal
    /// Unexpected internal failure
    InternalError,
    /// Storage layer failure
    DatabaseError,
    /// Data serialization/deserialization failure
    SerializationError,
    /// Invalid or missing configuration
    ConfigError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::ValidationFailed | Self::InvalidReference => 400,
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::ResourceAlreadyExists | Self::ConcurrencyConflict | Self::ResourceInUse => 409,
            Self::RequestTimeout => 408,
            Self::PayloadTooLarge => 413,
            Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::ConfigError => 500,
        }
    }

    /// Short, stable title used in problem-details responses
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication required",
            Self::AuthInvalid => "Invalid credentials",
            Self::AuthExpired => "Credentials expired",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidInput => "Invalid input",
            Self::ValidationFailed => "Validation failed",
            Self::InvalidReference => "Invalid reference",
            Self::ResourceNotFound => "Resource not found",
            Self::ResourceAlreadyExists => "Resource already exists",
            Self::ConcurrencyConflict => "Concurrency conflict",
            Self::ResourceInUse => "Resource in use",
            Self::RequestTimeout => "Request timeout",
            Self::PayloadTooLarge => "Payload too large",
            Self::InternalError => "Internal error",
            Self::DatabaseError => "Database error",
            Self::SerializationError => "Serialization error",
            Self::ConfigError => "Configuration error",
        }
    }

    /// Wire representation (`RESOURCE_NOT_FOUND`, ...)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::AuthInvalid => "AUTH_INVALID",
            Self::AuthExpired => "AUTH_EXPIRED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::ResourceAlreadyExists => "RESOURCE_ALREADY_EXISTS",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::ResourceInUse => "RESOURCE_IN_USE",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Whether errors with this code indicate a server-side fault
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.http_status() >= 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field-level validation errors, empty unless `code` is a validation code
    pub field_errors: Vec<FieldError>,
    /// Request the error occurred under
    pub request_id: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: Vec::new(),
            request_id: None,
            source: None,
        }
    }

    /// Attach the request id
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Field errors grouped by field name, in field order
    #[must_use]
    pub fn grouped_field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.field_errors {
            grouped
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Missing bearer token")
    }

    /// Invalid authentication
    #[must_use]
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Bearer token has expired")
    }

    /// Permission denied
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Validation failure carrying the offending fields
    #[must_use]
    pub fn validation(field_errors: Vec<FieldError>) -> Self {
        let message = match field_errors.as_slice() {
            [single] => format!("{}: {}", single.field, single.message),
            many => format!("{} fields failed validation", many.len()),
        };
        Self {
            field_errors,
            ..Self::new(ErrorCode::ValidationFailed, message)
        }
    }

    /// Reference to a missing entity
    #[must_use]
    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidReference, message)
    }

    /// Unique index violation
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// Stale concurrency stamp
    #[must_use]
    pub fn concurrency_conflict(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConcurrencyConflict,
            format!(
                "{} was modified by another request; reload and retry",
                resource.into()
            ),
        )
    }

    /// Entity still referenced by other rows
    #[must_use]
    pub fn in_use(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceInUse,
            format!("{} is still referenced and cannot be deleted", resource.into()),
        )
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.title(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// RFC 7807 problem details body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// Problem type URI
    #[serde(rename = "type")]
    pub problem_type: String,
    /// Short summary of the problem type
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Occurrence-specific explanation
    pub detail: String,
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Field-level validation errors grouped by field
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
    /// Request the problem occurred under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<&AppError> for ProblemDetails {
    fn from(error: &AppError) -> Self {
        // Server faults never echo internal messages back to clients
        let detail = if error.code.is_server_error() {
            error.code.title().to_owned()
        } else {
            error.message.clone()
        };
        Self {
            problem_type: "about:blank".to_owned(),
            title: error.code.title().to_owned(),
            status: error.http_status(),
            detail,
            code: error.code,
            errors: error.grouped_field_errors(),
            request_id: error.request_id.clone(),
        }
    }
}

#[cfg(feature = "database-errors")]
mod database {
    use super::{AppError, ErrorCode};

    /// How a storage failure should be reported to callers
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum WriteKind {
        /// Insert or update
        Upsert,
        /// Delete
        Delete,
    }

    impl AppError {
        /// Classify a storage error raised by a write against `resource`
        ///
        /// Unique violations become conflicts, foreign key violations become
        /// invalid references on upsert and in-use conflicts on delete.
        #[must_use]
        pub fn from_write(error: sqlx::Error, resource: &str, kind: WriteKind) -> Self {
            let classified = error.as_database_error().and_then(|db| {
                if db.is_unique_violation() {
                    Some(Self::already_exists(format!(
                        "{resource} with the same unique value already exists"
                    )))
                } else if db.is_foreign_key_violation() {
                    Some(match kind {
                        WriteKind::Upsert => Self::invalid_reference(format!(
                            "{resource} references an entity that does not exist"
                        )),
                        WriteKind::Delete => Self::in_use(resource),
                    })
                } else {
                    None
                }
            });
            classified.unwrap_or_else(|| Self::from(error))
        }
    }

    impl From<sqlx::Error> for AppError {
        fn from(error: sqlx::Error) -> Self {
            let message = match &error {
                sqlx::Error::RowNotFound => "Row not found".to_owned(),
                sqlx::Error::PoolTimedOut => "Database connection pool timed out".to_owned(),
                other => format!("Database operation failed: {other}"),
            };
            Self::new(ErrorCode::DatabaseError, message).with_source(error)
        }
    }
}

#[cfg(feature = "database-errors")]
pub use database::WriteKind;

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ProblemDetails};
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::{header, HeaderValue, StatusCode};

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status =
                StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                tracing::error!(code = %self.code, request_id = ?self.request_id, error = %self, "Request failed");
            }
            let body = ProblemDetails::from(&self);
            let mut response = (status, Json(body)).into_response();
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/problem+json"),
            );
            response
        }
    }
}
