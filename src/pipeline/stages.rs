// ABOUTME: Cross-cutting pipeline stages that wrap every use-case execution
// ABOUTME: Validation short-circuits bad requests; logging records outcome and latency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::time::Duration;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::PipelineRequest;
use crate::errors::{AppError, AppResult};

/// What a stage knows about the execution it wraps
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    /// Use case name
    pub use_case: &'static str,
    /// Resource the use case operates on
    pub resource: &'static str,
    /// Correlation id of the HTTP request
    pub request_id: &'a str,
    /// Authenticated caller
    pub user_id: Uuid,
}

/// A pre/post processing hook around use-case handlers
///
/// `before` hooks run in chain order and may short-circuit with an error;
/// `after` hooks run in reverse order, only for stages whose `before` ran.
pub trait Stage: Send + Sync {
    /// Stage name for diagnostics
    fn name(&self) -> &'static str;

    /// Inspect the request before the handler runs
    ///
    /// # Errors
    ///
    /// Returning an error stops the chain; the handler is not invoked
    fn before(&self, ctx: &StageContext<'_>, request: &dyn PipelineRequest) -> AppResult<()>;

    /// Observe the outcome once the handler (or a later stage) finished
    fn after(&self, _ctx: &StageContext<'_>, _outcome: Result<(), &AppError>, _elapsed: Duration) {}
}

/// Rejects requests that break their field rules
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidationStage;

impl Stage for ValidationStage {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn before(&self, ctx: &StageContext<'_>, request: &dyn PipelineRequest) -> AppResult<()> {
        let errors = request.validate();
        if errors.is_empty() {
            return Ok(());
        }
        debug!(
            use_case = ctx.use_case,
            fields = errors.len(),
            "Request failed validation"
        );
        Err(AppError::validation(errors))
    }
}

/// Logs start, completion, failures and slow executions
#[derive(Debug, Clone, Copy)]
pub struct LoggingStage {
    slow_threshold: Duration,
}

impl LoggingStage {
    /// Warn about executions slower than `slow_threshold`
    #[must_use]
    pub const fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

impl Stage for LoggingStage {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn before(&self, ctx: &StageContext<'_>, request: &dyn PipelineRequest) -> AppResult<()> {
        debug!(
            use_case = ctx.use_case,
            resource = ctx.resource,
            request = ?request,
            "Handling request"
        );
        Ok(())
    }

    fn after(&self, ctx: &StageContext<'_>, outcome: Result<(), &AppError>, elapsed: Duration) {
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(()) => info!(
                use_case = ctx.use_case,
                resource = ctx.resource,
                duration_ms,
                "Request handled"
            ),
            Err(failure) if failure.code.is_server_error() => error!(
                use_case = ctx.use_case,
                resource = ctx.resource,
                duration_ms,
                code = %failure.code,
                error = %failure,
                "Request failed"
            ),
            Err(failure) => warn!(
                use_case = ctx.use_case,
                resource = ctx.resource,
                duration_ms,
                code = %failure.code,
                detail = %failure.message,
                "Request rejected"
            ),
        }

        if elapsed > self.slow_threshold {
            warn!(
                use_case = ctx.use_case,
                resource = ctx.resource,
                duration_ms,
                threshold_ms = u64::try_from(self.slow_threshold.as_millis()).unwrap_or(u64::MAX),
                "Slow request"
            );
        }
    }
}
