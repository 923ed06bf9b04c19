// ABOUTME: Use cases that follow relationships between entities
// ABOUTME: Parent rows are checked first so a missing parent is reported as not found
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use uuid::Uuid;

use super::{Listing, Targeted};
use crate::database::repository::exists;
use crate::database::{
    EquipmentGroupRepository, EquipmentRepository, ExerciseMuscleGroupRepository,
    ExerciseTypeRepository, MuscleGroupRepository, Repository, Scope,
    UserExerciseHistoryRepository, UserExerciseRepository, WorkoutSessionRepository,
};
use crate::errors::{AppError, AppResult};
use crate::models::{
    CompleteSessionInput, Equipment, ExerciseMuscleGroupDetail, ExerciseType,
    UserExerciseHistory, WorkoutSession,
};
use crate::pagination::PagedResult;
use crate::pipeline::{RequestContext, UseCase};

async fn require_parent<R: Repository>(repository: &R, scope: &Scope, id: Uuid) -> AppResult<()> {
    if exists::<R>(repository.pool(), scope, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found(R::RESOURCE))
    }
}

/// Muscle groups an exercise type works, with their function
pub struct ExerciseTypeMuscleGroups {
    exercise_types: ExerciseTypeRepository,
    links: ExerciseMuscleGroupRepository,
}

impl ExerciseTypeMuscleGroups {
    /// Use case over the exercise type and link repositories
    #[must_use]
    pub const fn new(
        exercise_types: ExerciseTypeRepository,
        links: ExerciseMuscleGroupRepository,
    ) -> Self {
        Self {
            exercise_types,
            links,
        }
    }
}

#[async_trait]
impl UseCase for ExerciseTypeMuscleGroups {
    type Request = Uuid;
    type Response = Vec<ExerciseMuscleGroupDetail>;

    const NAME: &'static str = "exercise_type_muscle_groups";

    fn resource(&self) -> &'static str {
        ExerciseMuscleGroupRepository::RESOURCE
    }

    async fn handle(
        &self,
        _ctx: &RequestContext,
        exercise_type_id: Uuid,
    ) -> AppResult<Vec<ExerciseMuscleGroupDetail>> {
        require_parent(&self.exercise_types, &Scope::Shared, exercise_type_id).await?;
        self.links.details_for_exercise_type(exercise_type_id).await
    }
}

/// Exercise types that work a muscle group
pub struct MuscleGroupExerciseTypes {
    muscle_groups: MuscleGroupRepository,
    exercise_types: ExerciseTypeRepository,
}

impl MuscleGroupExerciseTypes {
    /// Use case over the muscle group and exercise type repositories
    #[must_use]
    pub const fn new(
        muscle_groups: MuscleGroupRepository,
        exercise_types: ExerciseTypeRepository,
    ) -> Self {
        Self {
            muscle_groups,
            exercise_types,
        }
    }
}

#[async_trait]
impl UseCase for MuscleGroupExerciseTypes {
    type Request = Targeted<Listing<ExerciseTypeRepository>>;
    type Response = PagedResult<ExerciseType>;

    const NAME: &'static str = "muscle_group_exercise_types";

    fn resource(&self) -> &'static str {
        ExerciseTypeRepository::RESOURCE
    }

    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: Self::Request,
    ) -> AppResult<PagedResult<ExerciseType>> {
        require_parent(&self.muscle_groups, &Scope::Shared, request.id).await?;
        self.exercise_types
            .list_by_muscle_group(request.id, &request.body.query)
            .await
    }
}

/// Equipment belonging to an equipment group
pub struct EquipmentGroupEquipment {
    groups: EquipmentGroupRepository,
    equipment: EquipmentRepository,
}

impl EquipmentGroupEquipment {
    /// Use case over the equipment group and equipment repositories
    #[must_use]
    pub const fn new(groups: EquipmentGroupRepository, equipment: EquipmentRepository) -> Self {
        Self { groups, equipment }
    }
}

#[async_trait]
impl UseCase for EquipmentGroupEquipment {
    type Request = Targeted<Listing<EquipmentRepository>>;
    type Response = PagedResult<Equipment>;

    const NAME: &'static str = "equipment_group_equipment";

    fn resource(&self) -> &'static str {
        EquipmentRepository::RESOURCE
    }

    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: Self::Request,
    ) -> AppResult<PagedResult<Equipment>> {
        require_parent(&self.groups, &Scope::Shared, request.id).await?;
        self.equipment
            .list_by_group(request.id, &request.body.query)
            .await
    }
}

/// The caller's history entries for one of their exercise configurations
pub struct UserExerciseHistoryEntries {
    user_exercises: UserExerciseRepository,
    history: UserExerciseHistoryRepository,
}

impl UserExerciseHistoryEntries {
    /// Use case over the user exercise and history repositories
    #[must_use]
    pub const fn new(
        user_exercises: UserExerciseRepository,
        history: UserExerciseHistoryRepository,
    ) -> Self {
        Self {
            user_exercises,
            history,
        }
    }
}

#[async_trait]
impl UseCase for UserExerciseHistoryEntries {
    type Request = Targeted<Listing<UserExerciseHistoryRepository>>;
    type Response = PagedResult<UserExerciseHistory>;

    const NAME: &'static str = "user_exercise_history_entries";

    fn resource(&self) -> &'static str {
        UserExerciseHistoryRepository::RESOURCE
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        request: Self::Request,
    ) -> AppResult<PagedResult<UserExerciseHistory>> {
        let scope = ctx.scope_for(UserExerciseRepository::OWNERSHIP);
        require_parent(&self.user_exercises, &scope, request.id).await?;
        self.history
            .list_for_user_exercise(&scope, request.id, &request.body.query)
            .await
    }
}

/// The caller's history entries recorded in one of their sessions
pub struct WorkoutSessionHistoryEntries {
    sessions: WorkoutSessionRepository,
    history: UserExerciseHistoryRepository,
}

impl WorkoutSessionHistoryEntries {
    /// Use case over the workout session and history repositories
    #[must_use]
    pub const fn new(
        sessions: WorkoutSessionRepository,
        history: UserExerciseHistoryRepository,
    ) -> Self {
        Self { sessions, history }
    }
}

#[async_trait]
impl UseCase for WorkoutSessionHistoryEntries {
    type Request = Targeted<Listing<UserExerciseHistoryRepository>>;
    type Response = PagedResult<UserExerciseHistory>;

    const NAME: &'static str = "workout_session_history_entries";

    fn resource(&self) -> &'static str {
        UserExerciseHistoryRepository::RESOURCE
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        request: Self::Request,
    ) -> AppResult<PagedResult<UserExerciseHistory>> {
        let scope = ctx.scope_for(WorkoutSessionRepository::OWNERSHIP);
        require_parent(&self.sessions, &scope, request.id).await?;
        self.history
            .list_for_session(&scope, request.id, &request.body.query)
            .await
    }
}

/// Mark one of the caller's sessions completed
pub struct CompleteWorkoutSession {
    sessions: WorkoutSessionRepository,
}

impl CompleteWorkoutSession {
    /// Use case over the workout session repository
    #[must_use]
    pub const fn new(sessions: WorkoutSessionRepository) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl UseCase for CompleteWorkoutSession {
    type Request = Targeted<CompleteSessionInput>;
    type Response = WorkoutSession;

    const NAME: &'static str = "complete_workout_session";

    fn resource(&self) -> &'static str {
        WorkoutSessionRepository::RESOURCE
    }

    async fn handle(
        &self,
        ctx: &RequestContext,
        request: Self::Request,
    ) -> AppResult<WorkoutSession> {
        let Targeted { id, body } = request;
        self.sessions
            .complete(
                &ctx.scope_for(WorkoutSessionRepository::OWNERSHIP),
                id,
                body.concurrency_stamp,
                body.completed_at,
            )
            .await
    }
}
