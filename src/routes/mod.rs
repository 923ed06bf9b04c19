// ABOUTME: HTTP route organization for the LiftLog API
// ABOUTME: Shared server resources and the assembled application router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! Route module for the LiftLog API
//!
//! Each domain module contains only route definitions and thin handlers that
//! extract the request, run a use case through the pipeline and serialize the
//! result. Errors render as problem details.

/// Generic CRUD routes
pub mod crud;
/// Catalogue relationship routes
pub mod exercises;
/// Request extractors
pub mod extract;
/// Health check route
pub mod health;
/// Profile routes
pub mod users;
/// Training record routes
pub mod workouts;

pub use crud::CrudRoutes;
pub use exercises::ExerciseRoutes;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use health::HealthRoutes;
pub use users::UserRoutes;
pub use workouts::WorkoutRoutes;

use std::sync::Arc;

use axum::Router;

use crate::auth::TokenVerifier;
use crate::config::ServerConfig;
use crate::database::{
    Database, EquipmentGroupRepository, EquipmentRepository, ExerciseMuscleGroupRepository,
    ExerciseTypeRepository, MuscleFunctionRepository, MuscleGroupRepository,
    UserExerciseHistoryRepository, UserExerciseRepository, WorkoutSessionRepository,
};
use crate::errors::AppResult;
use crate::pipeline::Pipeline;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ServerResources {
    /// Connection pool and repositories
    pub database: Database,
    /// Bearer token verification
    pub verifier: TokenVerifier,
    /// Stage chain wrapping every use case
    pub pipeline: Pipeline,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources from a connected database and the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the token verification key cannot be loaded
    pub fn new(database: Database, config: Arc<ServerConfig>) -> AppResult<Self> {
        let verifier = TokenVerifier::from_config(&config.auth)?;
        let pipeline = Pipeline::standard(&config.pipeline);
        Ok(Self {
            database,
            verifier,
            pipeline,
            config,
        })
    }
}

/// Every API route, without the HTTP middleware stack
pub fn api_routes(resources: &Arc<ServerResources>) -> Router {
    let crud = [
        CrudRoutes::routes::<ExerciseTypeRepository>("/api/exercise-types", resources.clone()),
        CrudRoutes::routes::<MuscleGroupRepository>("/api/muscle-groups", resources.clone()),
        CrudRoutes::routes::<MuscleFunctionRepository>("/api/muscle-functions", resources.clone()),
        CrudRoutes::routes::<EquipmentGroupRepository>("/api/equipment-groups", resources.clone()),
        CrudRoutes::routes::<EquipmentRepository>("/api/equipment", resources.clone()),
        CrudRoutes::routes::<ExerciseMuscleGroupRepository>(
            "/api/exercise-muscle-groups",
            resources.clone(),
        ),
        CrudRoutes::routes::<UserExerciseRepository>("/api/user-exercises", resources.clone()),
        CrudRoutes::routes::<UserExerciseHistoryRepository>(
            "/api/user-exercise-history",
            resources.clone(),
        ),
        CrudRoutes::routes::<WorkoutSessionRepository>(
            "/api/workout-sessions",
            resources.clone(),
        ),
    ];

    crud.into_iter().fold(
        Router::new()
            .merge(HealthRoutes::routes(resources.clone()))
            .merge(ExerciseRoutes::routes(resources.clone()))
            .merge(WorkoutRoutes::routes(resources.clone()))
            .merge(UserRoutes::routes(resources.clone())),
        |router, routes| router.merge(routes),
    )
}
