// ABOUTME: Tracing subscriber setup and audit-style log events for the LiftLog server
// ABOUTME: Selects json, full or compact output and quiets chatty dependency targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! Structured logging configuration
//!
//! `RUST_LOG` drives the filter, `LOG_FORMAT` picks the output format. Without
//! `LOG_FORMAT`, production deployments log `JSON` and everything else logs
//! the full human-readable format. Every format writes to stdout.

use std::env;
use std::io;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use uuid::Uuid;

use crate::config::Environment;
use crate::constants::service_names;

/// Dependency targets capped below the application's level
const QUIET_TARGETS: &[&str] = &[
    "hyper=warn",
    "hyper_util=warn",
    "h2=warn",
    "sqlx=warn",
    "tower_http=info",
];

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One `JSON` object per event, for log shippers
    Json,
    /// Human-readable multi-field lines
    #[default]
    Full,
    /// Abbreviated single lines
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; unknown values fall back to [`Self::Full`]
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Full,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `liftlog_server=debug`
    pub filter: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line
    pub with_location: bool,
    /// Emit span open/close events
    pub with_span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::default(),
            with_location: false,
            with_span_events: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults for a deployment environment
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        let format = if environment.is_production() {
            LogFormat::Json
        } else {
            LogFormat::Full
        };
        Self {
            format,
            ..Self::default()
        }
    }

    /// Read `RUST_LOG`, `LOG_FORMAT`, `LOG_INCLUDE_LOCATION` and `LOG_INCLUDE_SPANS`
    ///
    /// `ENVIRONMENT` picks the format when `LOG_FORMAT` is unset.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::for_environment(Environment::from_env());
        Self {
            filter: env::var("RUST_LOG")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.filter),
            format: env::var("LOG_FORMAT").map_or(defaults.format, |value| LogFormat::parse(&value)),
            with_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            with_span_events: env::var("LOG_INCLUDE_SPANS").is_ok(),
        }
    }

    /// Filter built from the configured directives plus [`QUIET_TARGETS`]
    ///
    /// Directives that fail to parse are skipped.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        QUIET_TARGETS
            .iter()
            .filter_map(|directive| directive.parse().ok())
            .fold(EnvFilter::new(&self.filter), EnvFilter::add_directive)
    }

    fn span_events(&self) -> FmtSpan {
        if self.with_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let output = match self.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_file(self.with_location)
                .with_line_number(self.with_location)
                .with_span_events(self.span_events())
                .with_writer(io::stdout)
                .boxed(),
            LogFormat::Full => fmt::layer()
                .with_file(self.with_location)
                .with_line_number(self.with_location)
                .with_span_events(self.span_events())
                .with_writer(io::stdout)
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stdout)
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(output)
            .with(self.env_filter())
            .try_init()?;

        info!(
            service = service_names::LIFTLOG_SERVER,
            version = env!("CARGO_PKG_VERSION"),
            filter = %self.filter,
            format = ?self.format,
            "Logging initialized"
        );
        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Audit events with a stable shape, searchable by `audit.event`
pub struct AppLogger;

impl AppLogger {
    /// A caller was seen for the first time and got a user row
    pub fn log_user_provisioned(user_id: Uuid, subject: &str) {
        info!(
            audit.event = "user_provisioned",
            user.id = %user_id,
            user.subject = %subject,
            "Provisioned user on first authenticated request"
        );
    }

    /// A bearer token was rejected for a reason worth an operator's attention
    pub fn log_token_rejected(reason: &str, details: &str) {
        warn!(
            audit.event = "token_rejected",
            auth.reason = %reason,
            auth.details = %details,
            "Bearer token rejected"
        );
    }
}
