// ABOUTME: Routes over the caller's own training records beyond plain CRUD
// ABOUTME: History of an exercise configuration or session, and session completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::ServerResources;
use crate::errors::AppError;
use crate::models::CompleteSessionInput;
use crate::pagination::QueryRequest;
use crate::pipeline::RequestContext;
use crate::use_cases::{
    CompleteWorkoutSession, Listing, Targeted, UserExerciseHistoryEntries,
    WorkoutSessionHistoryEntries,
};

/// Training record routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create the training record routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/user-exercises/:id/history",
                get(Self::handle_user_exercise_history),
            )
            .route(
                "/api/workout-sessions/:id/history",
                get(Self::handle_session_history),
            )
            .route(
                "/api/workout-sessions/:id/complete",
                post(Self::handle_complete_session),
            )
            .with_state(resources)
    }

    async fn handle_user_exercise_history(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
        ApiQuery(query): ApiQuery<QueryRequest>,
    ) -> Result<Response, AppError> {
        let use_case = UserExerciseHistoryEntries::new(
            resources.database.repository(),
            resources.database.repository(),
        );
        let page = resources
            .pipeline
            .execute(&use_case, &ctx, Targeted::new(id, Listing::new(query)))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_session_history(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
        ApiQuery(query): ApiQuery<QueryRequest>,
    ) -> Result<Response, AppError> {
        let use_case = WorkoutSessionHistoryEntries::new(
            resources.database.repository(),
            resources.database.repository(),
        );
        let page = resources
            .pipeline
            .execute(&use_case, &ctx, Targeted::new(id, Listing::new(query)))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_complete_session(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
        ApiJson(body): ApiJson<CompleteSessionInput>,
    ) -> Result<Response, AppError> {
        let use_case = CompleteWorkoutSession::new(resources.database.repository());
        let session = resources
            .pipeline
            .execute(&use_case, &ctx, Targeted::new(id, body))
            .await?;
        Ok((StatusCode::OK, Json(session)).into_response())
    }
}
