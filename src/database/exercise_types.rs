// ABOUTME: Database operations for exercise types (shared reference data)
// ABOUTME: Unique names, free-text search over name/description, admin-only writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::query::{PagedQuery, QuerySpec};
use super::repository::{missed_write, Ownership, Repository, Scope};
use super::{format_timestamp, get_column, read_meta};
use crate::constants::resources;
use crate::errors::{AppError, AppResult, WriteKind};
use crate::models::{normalize_optional, EntityMeta, ExerciseType, ExerciseTypeInput};
use crate::pagination::{PagedResult, QueryRequest};

/// Exercise type database operations manager
pub struct ExerciseTypeRepository {
    pool: SqlitePool,
}

impl QuerySpec for ExerciseTypeRepository {
    const TABLE: &'static str = "exercise_types";
    const COLUMNS: &'static str =
        "id, created_at, updated_at, concurrency_stamp, name, description, instructions";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "description"];
    const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ];
    const DEFAULT_SORT: &'static str = "name";
}

impl ExerciseTypeRepository {
    /// Page through the exercise types that work a muscle group
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_by_muscle_group(
        &self,
        muscle_group_id: Uuid,
        request: &QueryRequest,
    ) -> AppResult<PagedResult<ExerciseType>> {
        PagedQuery::<Self>::new(&Scope::Shared, request)
            .filter_in(
                "id",
                "SELECT exercise_type_id FROM exercise_muscle_groups WHERE muscle_group_id = ",
                muscle_group_id,
            )
            .fetch(&self.pool, Self::from_row)
            .await
    }
}

#[async_trait]
impl Repository for ExerciseTypeRepository {
    type Entity = ExerciseType;
    type Input = ExerciseTypeInput;

    const RESOURCE: &'static str = resources::EXERCISE_TYPE;
    const OWNERSHIP: Ownership = Ownership::Shared;

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn from_row(row: &SqliteRow) -> AppResult<ExerciseType> {
        Ok(ExerciseType {
            meta: read_meta(row)?,
            name: get_column(row, "name")?,
            description: get_column(row, "description")?,
            instructions: get_column(row, "instructions")?,
        })
    }

    async fn create(&self, _scope: &Scope, input: &ExerciseTypeInput) -> AppResult<ExerciseType> {
        let meta = EntityMeta::fresh();
        let exercise = ExerciseType {
            meta,
            name: input.name.trim().to_owned(),
            description: normalize_optional(input.description.as_deref()),
            instructions: normalize_optional(input.instructions.as_deref()),
        };

        sqlx::query(
            r"
            INSERT INTO exercise_types (id, name, description, instructions, created_at, updated_at, concurrency_stamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(exercise.meta.id.to_string())
        .bind(&exercise.name)
        .bind(&exercise.description)
        .bind(&exercise.instructions)
        .bind(format_timestamp(exercise.meta.created_at))
        .bind(format_timestamp(exercise.meta.updated_at))
        .bind(exercise.meta.concurrency_stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Upsert))?;

        Ok(exercise)
    }

    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &ExerciseTypeInput,
    ) -> AppResult<ExerciseType> {
        let result = sqlx::query(
            r"
            UPDATE exercise_types SET
                name = $1, description = $2, instructions = $3,
                updated_at = $4, concurrency_stamp = $5
            WHERE id = $6 AND concurrency_stamp = $7
            ",
        )
        .bind(input.name.trim())
        .bind(normalize_optional(input.description.as_deref()))
        .bind(normalize_optional(input.instructions.as_deref()))
        .bind(format_timestamp(Utc::now()))
        .bind(Uuid::new_v4().to_string())
        .bind(id.to_string())
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
