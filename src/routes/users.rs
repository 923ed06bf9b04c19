// ABOUTME: Routes for the authenticated caller's profile
// ABOUTME: GET and PUT /api/users/me
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::extract::ApiJson;
use super::ServerResources;
use crate::errors::AppError;
use crate::models::{UpdateProfileInput, Versioned};
use crate::pipeline::RequestContext;
use crate::use_cases::{GetCurrentUser, UpdateCurrentUser};

/// Profile routes
pub struct UserRoutes;

impl UserRoutes {
    /// Create the profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/me",
                get(Self::handle_get_me).put(Self::handle_update_me),
            )
            .with_state(resources)
    }

    async fn handle_get_me(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
    ) -> Result<Response, AppError> {
        let use_case = GetCurrentUser::new(resources.database.users());
        let user = resources.pipeline.execute(&use_case, &ctx, ()).await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }

    async fn handle_update_me(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiJson(body): ApiJson<Versioned<UpdateProfileInput>>,
    ) -> Result<Response, AppError> {
        let use_case = UpdateCurrentUser::new(resources.database.users());
        let user = resources.pipeline.execute(&use_case, &ctx, body).await?;
        Ok((StatusCode::OK, Json(user)).into_response())
    }
}
