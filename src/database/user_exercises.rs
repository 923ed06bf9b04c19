// ABOUTME: Database operations for a user's per-exercise training configuration
// ABOUTME: Rows are owner-scoped; one configuration per user and exercise type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::query::QuerySpec;
use super::repository::{missed_write, owner_of, Ownership, Repository, Scope};
use super::{format_timestamp, get_column, get_optional_uuid, get_uuid, read_meta};
use crate::constants::resources;
use crate::errors::{AppError, AppResult, WriteKind};
use crate::models::{normalize_optional, EntityMeta, UserExercise, UserExerciseInput};
use crate::pagination::SortDirection;

/// User exercise database operations manager
pub struct UserExerciseRepository {
    pool: SqlitePool,
}

impl QuerySpec for UserExerciseRepository {
    const TABLE: &'static str = "user_exercises";
    const COLUMNS: &'static str = "id, created_at, updated_at, concurrency_stamp, user_id, \
                                   exercise_type_id, equipment_id, target_sets, target_reps, \
                                   target_weight, weight_increment, notes";
    const OWNER_COLUMN: Option<&'static str> = Some("user_id");
    const SEARCH_COLUMNS: &'static [&'static str] = &["notes"];
    const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
        ("target_weight", "target_weight"),
    ];
    const DEFAULT_SORT: &'static str = "created_at";
    const DEFAULT_DIRECTION: SortDirection = SortDirection::Desc;
}

#[async_trait]
impl Repository for UserExerciseRepository {
    type Entity = UserExercise;
    type Input = UserExerciseInput;

    const RESOURCE: &'static str = resources::USER_EXERCISE;
    const OWNERSHIP: Ownership = Ownership::Owned;

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn from_row(row: &SqliteRow) -> AppResult<UserExercise> {
        Ok(UserExercise {
            meta: read_meta(row)?,
            user_id: get_uuid(row, "user_id")?,
            exercise_type_id: get_uuid(row, "exercise_type_id")?,
            equipment_id: get_optional_uuid(row, "equipment_id")?,
            target_sets: get_column(row, "target_sets")?,
            target_reps: get_column(row, "target_reps")?,
            target_weight: get_column(row, "target_weight")?,
            weight_increment: get_column(row, "weight_increment")?,
            notes: get_column(row, "notes")?,
        })
    }

    async fn create(&self, scope: &Scope, input: &UserExerciseInput) -> AppResult<UserExercise> {
        let user_exercise = UserExercise {
            meta: EntityMeta::fresh(),
            user_id: owner_of(scope)?,
            exercise_type_id: input.exercise_type_id,
            equipment_id: input.equipment_id,
            target_sets: input.target_sets,
            target_reps: input.target_reps,
            target_weight: input.target_weight,
            weight_increment: input.weight_increment,
            notes: normalize_optional(input.notes.as_deref()),
        };

        sqlx::query(
            r"
            INSERT INTO user_exercises (
                id, user_id, exercise_type_id, equipment_id, target_sets, target_reps,
                target_weight, weight_increment, notes, created_at, updated_at, concurrency_stamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(user_exercise.meta.id.to_string())
        .bind(user_exercise.user_id.to_string())
        .bind(user_exercise.exercise_type_id.to_string())
        .bind(user_exercise.equipment_id.map(|id| id.to_string()))
        .bind(user_exercise.target_sets)
        .bind(user_exercise.target_reps)
        .bind(user_exercise.target_weight)
        .bind(user_exercise.weight_increment)
        .bind(&user_exercise.notes)
        .bind(format_timestamp(user_exercise.meta.created_at))
        .bind(format_timestamp(user_exercise.meta.updated_at))
        .bind(user_exercise.meta.concurrency_stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Upsert))?;

        Ok(user_exercise)
    }

    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &UserExerciseInput,
    ) -> AppResult<UserExercise> {
        let user_id = owner_of(scope)?;
        let result = sqlx::query(
            r"
            UPDATE user_exercises SET
                exercise_type_id = $1, equipment_id = $2, target_sets = $3, target_reps = $4,
                target_weight = $5, weight_increment = $6, notes = $7,
                updated_at = $8, concurrency_stamp = $9
            WHERE id = $10 AND user_id = $11 AND concurrency_stamp = $12
            ",
        )
        .bind(input.exercise_type_id.to_string())
        .bind(input.equipment_id.map(|id| id.to_string()))
        .bind(input.target_sets)
        .bind(input.target_reps)
        .bind(input.target_weight)
        .bind(input.weight_increment)
        .bind(normalize_optional(input.notes.as_deref()))
        .bind(format_timestamp(Utc::now()))
        .bind(Uuid::new_v4().to_string())
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Upsert))?;

        if result.rows_affected() == 0 {
            return Err(missed_write::<Self>(&self.pool, scope, id).await);
        }
        self.reload(scope, id).await
    }
}
