// ABOUTME: Integration tests for the request pipeline stage chain
// ABOUTME: Covers hook ordering, short-circuiting and request id tagging of errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use liftlog_server::config::PipelineConfig;
use liftlog_server::errors::{AppError, AppResult, ErrorCode, FieldError};
use liftlog_server::pipeline::{
    Pipeline, PipelineRequest, RequestContext, Stage, StageContext, UseCase,
};
use liftlog_server::validation::Validate;

#[derive(Debug)]
struct Echo {
    text: String,
}

impl Validate for Echo {
    fn validate(&self) -> Vec<FieldError> {
        if self.text.is_empty() {
            vec![FieldError::new("text", "must not be empty")]
        } else {
            Vec::new()
        }
    }
}

#[derive(Default)]
struct EchoUseCase {
    calls: AtomicUsize,
    fail_with: Option<ErrorCode>,
}

#[async_trait]
impl UseCase for EchoUseCase {
    type Request = Echo;
    type Response = String;

    const NAME: &'static str = "echo";

    fn resource(&self) -> &'static str {
        "Echo"
    }

    async fn handle(&self, _ctx: &RequestContext, request: Echo) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(code) => Err(AppError::new(code, "handler failed")),
            None => Ok(request.text.to_uppercase()),
        }
    }
}

type Journal = Arc<Mutex<Vec<String>>>;

struct Recording {
    name: &'static str,
    journal: Journal,
    reject: bool,
}

impl Stage for Recording {
    fn name(&self) -> &'static str {
        self.name
    }

    fn before(&self, _ctx: &StageContext<'_>, _request: &dyn PipelineRequest) -> AppResult<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("before:{}", self.name));
        if self.reject {
            return Err(AppError::permission_denied("rejected by stage"));
        }
        Ok(())
    }

    fn after(&self, _ctx: &StageContext<'_>, outcome: Result<(), &AppError>, _elapsed: Duration) {
        self.journal.lock().unwrap().push(format!(
            "after:{}:{}",
            self.name,
            if outcome.is_ok() { "ok" } else { "err" }
        ));
    }
}

fn recording(name: &'static str, journal: &Journal, reject: bool) -> Arc<dyn Stage> {
    Arc::new(Recording {
        name,
        journal: journal.clone(),
        reject,
    })
}

#[tokio::test]
async fn test_after_hooks_run_in_reverse_order() {
    let database = common::create_test_database().await;
    let ctx = common::create_test_context(&database, "pipeline-order", false).await;
    let journal = Journal::default();
    let pipeline = Pipeline::new(vec![
        recording("first", &journal, false),
        recording("second", &journal, false),
    ]);

    let result = pipeline
        .execute(&EchoUseCase::default(), &ctx, Echo { text: "hi".into() })
        .await
        .unwrap();

    assert_eq!(result, "HI");
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "before:first",
            "before:second",
            "after:second:ok",
            "after:first:ok"
        ]
    );
}

#[tokio::test]
async fn test_rejecting_stage_skips_handler_and_later_stages() {
    let database = common::create_test_database().await;
    let ctx = common::create_test_context(&database, "pipeline-reject", false).await;
    let journal = Journal::default();
    let pipeline = Pipeline::new(vec![
        recording("first", &journal, false),
        recording("guard", &journal, true),
        recording("never", &journal, false),
    ]);
    let use_case = EchoUseCase::default();

    let error = pipeline
        .execute(&use_case, &ctx, Echo { text: "hi".into() })
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::PermissionDenied);
    assert_eq!(use_case.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "before:first",
            "before:guard",
            "after:guard:err",
            "after:first:err"
        ]
    );
}

#[tokio::test]
async fn test_standard_pipeline_validates_before_handling() {
    let database = common::create_test_database().await;
    let ctx = common::create_test_context(&database, "pipeline-validate", false).await;
    let pipeline = Pipeline::standard(&PipelineConfig {
        slow_request_threshold_ms: 500,
    });
    assert_eq!(pipeline.stage_names(), vec!["validation", "logging"]);

    let use_case = EchoUseCase::default();
    let error = pipeline
        .execute(&use_case, &ctx, Echo { text: String::new() })
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::ValidationFailed);
    assert_eq!(error.field_errors[0].field, "text");
    assert_eq!(error.request_id.as_deref(), Some("test-pipeline-validate"));
    assert_eq!(use_case.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_handler_errors_carry_request_id() {
    let database = common::create_test_database().await;
    let ctx = common::create_test_context(&database, "pipeline-error", false).await;
    let pipeline = Pipeline::standard(&PipelineConfig {
        slow_request_threshold_ms: 0,
    });
    let use_case = EchoUseCase {
        fail_with: Some(ErrorCode::InternalError),
        ..EchoUseCase::default()
    };

    let error = pipeline
        .execute(&use_case, &ctx, Echo { text: "hi".into() })
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InternalError);
    assert_eq!(error.request_id.as_deref(), Some("test-pipeline-error"));
    assert_eq!(use_case.calls.load(Ordering::SeqCst), 1);
}
