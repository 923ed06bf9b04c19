// ABOUTME: Generic collection and item routes for every repository-backed entity
// ABOUTME: GET/POST on the collection, GET/PUT/DELETE on items, all through the pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::ServerResources;
use crate::database::Repository;
use crate::errors::AppError;
use crate::models::Versioned;
use crate::pagination::QueryRequest;
use crate::pipeline::RequestContext;
use crate::use_cases::{
    CreateEntity, DeleteEntity, DeleteRequest, GetEntity, ListEntities, Listing, Targeted,
    UpdateEntity,
};

/// Query parameters accepted by item deletion
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    /// Delete only if the stored stamp still matches
    pub concurrency_stamp: Option<Uuid>,
}

/// CRUD route builder
pub struct CrudRoutes;

impl CrudRoutes {
    /// Collection and item routes for `R` mounted at `path`
    pub fn routes<R: Repository>(path: &str, resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                path,
                get(Self::handle_list::<R>).post(Self::handle_create::<R>),
            )
            .route(
                &format!("{path}/:id"),
                get(Self::handle_get::<R>)
                    .put(Self::handle_update::<R>)
                    .delete(Self::handle_delete::<R>),
            )
            .with_state(resources)
    }

    async fn handle_list<R: Repository>(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiQuery(query): ApiQuery<QueryRequest>,
    ) -> Result<Response, AppError> {
        let use_case = ListEntities::new(resources.database.repository::<R>());
        let page = resources
            .pipeline
            .execute(&use_case, &ctx, Listing::new(query))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_get<R: Repository>(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
    ) -> Result<Response, AppError> {
        let use_case = GetEntity::new(resources.database.repository::<R>());
        let entity = resources.pipeline.execute(&use_case, &ctx, id).await?;
        Ok((StatusCode::OK, Json(entity)).into_response())
    }

    async fn handle_create<R: Repository>(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiJson(input): ApiJson<R::Input>,
    ) -> Result<Response, AppError> {
        let use_case = CreateEntity::new(resources.database.repository::<R>());
        let entity = resources.pipeline.execute(&use_case, &ctx, input).await?;
        Ok((StatusCode::CREATED, Json(entity)).into_response())
    }

    async fn handle_update<R: Repository>(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
        ApiJson(body): ApiJson<Versioned<R::Input>>,
    ) -> Result<Response, AppError> {
        let use_case = UpdateEntity::new(resources.database.repository::<R>());
        let entity = resources
            .pipeline
            .execute(&use_case, &ctx, Targeted::new(id, body))
            .await?;
        Ok((StatusCode::OK, Json(entity)).into_response())
    }

    async fn handle_delete<R: Repository>(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
        ApiQuery(params): ApiQuery<DeleteParams>,
    ) -> Result<Response, AppError> {
        let use_case = DeleteEntity::new(resources.database.repository::<R>());
        let request = DeleteRequest {
            id,
            concurrency_stamp: params.concurrency_stamp,
        };
        resources.pipeline.execute(&use_case, &ctx, request).await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
