// ABOUTME: Database operations for the exercise type to muscle group join
// ABOUTME: Resolves the muscle groups an exercise works, with the function of each
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::query::QuerySpec;
use super::repository::{missed_write, Ownership, Repository, Scope};
use super::{format_timestamp, get_column, get_uuid, read_meta};
use crate::constants::resources;
use crate::errors::{AppError, AppResult, WriteKind};
use crate::models::{
    EntityMeta, ExerciseMuscleGroup, ExerciseMuscleGroupDetail, ExerciseMuscleGroupInput,
    NamedRef,
};

/// Exercise/muscle group link database operations manager
pub struct ExerciseMuscleGroupRepository {
    pool: SqlitePool,
}

impl QuerySpec for ExerciseMuscleGroupRepository {
    const TABLE: &'static str = "exercise_muscle_groups";
    const COLUMNS: &'static str = "id, created_at, updated_at, concurrency_stamp, \
                                   exercise_type_id, muscle_group_id, muscle_function_id";
    const SORT_FIELDS: &'static [(&'static str, &'static str)] =
        &[("created_at", "created_at"), ("updated_at", "updated_at")];
    const DEFAULT_SORT: &'static str = "created_at";
}

impl ExerciseMuscleGroupRepository {
    /// Muscle groups worked by an exercise type, ordered by muscle group name
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn details_for_exercise_type(
        &self,
        exercise_type_id: Uuid,
    ) -> AppResult<Vec<ExerciseMuscleGroupDetail>> {
        let rows = sqlx::query(
            r"
            SELECT emg.id, mg.id AS muscle_group_id, mg.name AS muscle_group_name,
                   mf.id AS muscle_function_id, mf.name AS muscle_function_name
            FROM exercise_muscle_groups emg
            JOIN muscle_groups mg ON mg.id = emg.muscle_group_id
            JOIN muscle_functions mf ON mf.id = emg.muscle_function_id
            WHERE emg.exercise_type_id = $1
            ORDER BY mg.name ASC, emg.id ASC
            ",
        )
        .bind(exercise_type_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercise muscle groups: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(ExerciseMuscleGroupDetail {
                    id: get_uuid(row, "id")?,
                    muscle_group: NamedRef {
                        id: get_uuid(row, "muscle_group_id")?,
                        name: get_column(row, "muscle_group_name")?,
                    },
                    muscle_function: NamedRef {
                        id: get_uuid(row, "muscle_function_id")?,
                        name: get_column(row, "muscle_function_name")?,
                    },
                })
            })
            .collect()
    }
}

#[async_trait]
impl Repository for ExerciseMuscleGroupRepository {
    type Entity = ExerciseMuscleGroup;
    type Input = ExerciseMuscleGroupInput;

    const RESOURCE: &'static str = resources::EXERCISE_MUSCLE_GROUP;
    const OWNERSHIP: Ownership = Ownership::Shared;

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn from_row(row: &SqliteRow) -> AppResult<ExerciseMuscleGroup> {
        Ok(ExerciseMuscleGroup {
            meta: read_meta(row)?,
            exercise_type_id: get_uuid(row, "exercise_type_id")?,
            muscle_group_id: get_uuid(row, "muscle_group_id")?,
            muscle_function_id: get_uuid(row, "muscle_function_id")?,
        })
    }

    async fn create(
        &self,
        _scope: &Scope,
        input: &ExerciseMuscleGroupInput,
    ) -> AppResult<ExerciseMuscleGroup> {
        let link = ExerciseMuscleGroup {
            meta: EntityMeta::fresh(),
            exercise_type_id: input.exercise_type_id,
            muscle_group_id: input.muscle_group_id,
            muscle_function_id: input.muscle_function_id,
        };

        sqlx::query(
            r"
            INSERT INTO exercise_muscle_groups
                (id, exercise_type_id, muscle_group_id, muscle_function_id, created_at, updated_at, concurrency_stamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(link.meta.id.to_string())
        .bind(link.exercise_type_id.to_string())
        .bind(link.muscle_group_id.to_string())
        .bind(link.muscle_function_id.to_string())
        .bind(format_timestamp(link.meta.created_at))
        .bind(format_timestamp(link.meta.updated_at))
        .bind(link.meta.concurrency_stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Upsert))?;

        Ok(link)
    }

    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &ExerciseMuscleGroupInput,
    ) -> AppResult<ExerciseMuscleGroup> {
        let result = sqlx::query(
            r"
            UPDATE exercise_muscle_groups SET
                exercise_type_id = $1, muscle_group_id = $2, muscle_function_id = $3,
                updated_at = $4, concurrency_stamp = $5
            WHERE id = $6 AND concurrency_stamp = $7
            ",
        )
        .bind(input.exercise_type_id.to_string())
        .bind(input.muscle_group_id.to_string())
        .bind(input.muscle_function_id.to_string())
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
