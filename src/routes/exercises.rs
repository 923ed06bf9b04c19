// ABOUTME: Relationship routes over the shared exercise and equipment catalogue
// ABOUTME: Muscle groups of an exercise type, exercise types of a muscle group, equipment of a group
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use super::extract::{ApiPath, ApiQuery};
use super::ServerResources;
use crate::errors::AppError;
use crate::pagination::QueryRequest;
use crate::pipeline::RequestContext;
use crate::use_cases::{
    EquipmentGroupEquipment, ExerciseTypeMuscleGroups, Listing, MuscleGroupExerciseTypes,
    Targeted,
};

/// Catalogue relationship routes
pub struct ExerciseRoutes;

impl ExerciseRoutes {
    /// Create the catalogue relationship routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/exercise-types/:id/muscle-groups",
                get(Self::handle_exercise_type_muscle_groups),
            )
            .route(
                "/api/muscle-groups/:id/exercise-types",
                get(Self::handle_muscle_group_exercise_types),
            )
            .route(
                "/api/equipment-groups/:id/equipment",
                get(Self::handle_equipment_group_equipment),
            )
            .with_state(resources)
    }

    async fn handle_exercise_type_muscle_groups(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
    ) -> Result<Response, AppError> {
        let use_case = ExerciseTypeMuscleGroups::new(
            resources.database.repository(),
            resources.database.repository(),
        );
        let details = resources.pipeline.execute(&use_case, &ctx, id).await?;
        Ok((StatusCode::OK, Json(details)).into_response())
    }

    async fn handle_muscle_group_exercise_types(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
        ApiQuery(query): ApiQuery<QueryRequest>,
    ) -> Result<Response, AppError> {
        let use_case = MuscleGroupExerciseTypes::new(
            resources.database.repository(),
            resources.database.repository(),
        );
        let page = resources
            .pipeline
            .execute(&use_case, &ctx, Targeted::new(id, Listing::new(query)))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_equipment_group_equipment(
        State(resources): State<Arc<ServerResources>>,
        ctx: RequestContext,
        ApiPath(id): ApiPath<Uuid>,
        ApiQuery(query): ApiQuery<QueryRequest>,
    ) -> Result<Response, AppError> {
        let use_case = EquipmentGroupEquipment::new(
            resources.database.repository(),
            resources.database.repository(),
        );
        let page = resources
            .pipeline
            .execute(&use_case, &ctx, Targeted::new(id, Listing::new(query)))
            .await?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }
}
