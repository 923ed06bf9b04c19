// ABOUTME: Request pipeline wrapping every use case in ordered cross-cutting stages
// ABOUTME: Defines UseCase, RequestContext and the Pipeline that runs stage hooks around handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # Request Pipeline
//!
//! Every operation the HTTP layer exposes is a [`UseCase`]. The [`Pipeline`]
//! runs each registered [`Stage`]'s `before` hook in order, invokes the
//! handler unless a stage rejected the request, then runs the `after` hooks
//! of the stages that ran in reverse order.

/// Built-in stages
pub mod stages;

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{info_span, Instrument};

pub use stages::{LoggingStage, Stage, StageContext, ValidationStage};

use crate::config::PipelineConfig;
use crate::database::{Ownership, Scope};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::validation::Validate;

/// Requests a use case accepts: checkable and printable for logs
pub trait PipelineRequest: Validate + Debug + Send + Sync {}

impl<T: Validate + Debug + Send + Sync> PipelineRequest for T {}

/// Who is calling and under which request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id of the HTTP request
    pub request_id: String,
    /// Authenticated, provisioned caller
    pub user: User,
    /// Whether the caller holds the administrator role
    pub is_admin: bool,
}

impl RequestContext {
    /// Tenancy scope for an entity with the given ownership model
    #[must_use]
    pub const fn scope_for(&self, ownership: Ownership) -> Scope {
        match ownership {
            Ownership::Shared => Scope::Shared,
            Ownership::Owned => Scope::Owner(self.user.meta.id),
        }
    }

    /// Reject callers without the administrator role
    ///
    /// # Errors
    ///
    /// Returns `PERMISSION_DENIED` for non-administrators
    pub fn require_admin(&self, resource: &str) -> AppResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::permission_denied(format!(
                "Modifying {resource} requires the administrator role"
            )))
        }
    }
}

/// One application operation
#[async_trait]
pub trait UseCase: Send + Sync {
    /// Input accepted by the handler
    type Request: PipelineRequest;
    /// Output produced on success
    type Response: Send;

    /// Operation name used in logs
    const NAME: &'static str;

    /// Resource the operation acts on
    fn resource(&self) -> &'static str;

    /// Run the operation
    ///
    /// # Errors
    ///
    /// Returns whatever the storage layer or the operation's own rules reject
    async fn handle(&self, ctx: &RequestContext, request: Self::Request)
        -> AppResult<Self::Response>;
}

/// Ordered chain of stages run around every use case
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<Vec<Arc<dyn Stage>>>,
}

impl Pipeline {
    /// Pipeline with an explicit stage chain
    #[must_use]
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Self {
        Self {
            stages: Arc::new(stages),
        }
    }

    /// Default chain: validation, then logging
    #[must_use]
    pub fn standard(config: &PipelineConfig) -> Self {
        Self::new(vec![
            Arc::new(ValidationStage),
            Arc::new(LoggingStage::new(Duration::from_millis(
                config.slow_request_threshold_ms,
            ))),
        ])
    }

    /// Names of the registered stages, in execution order
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run `use_case` for `request` through every stage
    ///
    /// # Errors
    ///
    /// Returns the first stage rejection or the handler's error, tagged with
    /// the request id
    pub async fn execute<U: UseCase>(
        &self,
        use_case: &U,
        ctx: &RequestContext,
        request: U::Request,
    ) -> AppResult<U::Response> {
        let span = info_span!(
            "use_case",
            use_case = U::NAME,
            resource = use_case.resource(),
            request_id = %ctx.request_id,
            user_id = %ctx.user.meta.id,
        );
        self.run(use_case, ctx, request)
            .instrument(span)
            .await
            .map_err(|error| error.with_request_id(ctx.request_id.clone()))
    }

    async fn run<U: UseCase>(
        &self,
        use_case: &U,
        ctx: &RequestContext,
        request: U::Request,
    ) -> AppResult<U::Response> {
        let stage_ctx = StageContext {
            use_case: U::NAME,
            resource: use_case.resource(),
            request_id: &ctx.request_id,
            user_id: ctx.user.meta.id,
        };
        let started = Instant::now();

        let mut invoked = 0;
        let mut rejection = None;
        for stage in self.stages.iter() {
            invoked += 1;
            if let Err(error) = stage.before(&stage_ctx, &request) {
                rejection = Some(error);
                break;
            }
        }

        let result = match rejection {
            Some(error) => Err(error),
            None => use_case.handle(ctx, request).await,
        };

        let elapsed = started.elapsed();
        let outcome = result.as_ref().map(|_| ());
        for stage in self.stages[..invoked].iter().rev() {
            stage.after(&stage_ctx, outcome, elapsed);
        }
        result
    }
}
