// ABOUTME: Database operations for performed exercise entries owned by a user
// ABOUTME: Entries may only reference the same user's exercise configuration and sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::query::{PagedQuery, QuerySpec};
use super::repository::{
    ensure_owned_reference, missed_write, owner_of, Ownership, Repository, Scope,
};
use super::{
    format_timestamp, get_column, get_optional_uuid, get_timestamp, get_uuid, read_meta,
};
use crate::constants::resources;
use crate::errors::{AppError, AppResult, WriteKind};
use crate::models::{
    normalize_optional, EntityMeta, UserExerciseHistory, UserExerciseHistoryInput,
};
use crate::pagination::{PagedResult, QueryRequest, SortDirection};

/// User exercise history database operations manager
pub struct UserExerciseHistoryRepository {
    pool: SqlitePool,
}

impl QuerySpec for UserExerciseHistoryRepository {
    const TABLE: &'static str = "user_exercise_history";
    const COLUMNS: &'static str = "id, created_at, updated_at, concurrency_stamp, user_id, \
                                   user_exercise_id, workout_session_id, performed_at, sets, \
                                   reps, weight, rpe, notes";
    const OWNER_COLUMN: Option<&'static str> = Some("user_id");
    const SEARCH_COLUMNS: &'static [&'static str] = &["notes"];
    const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("performed_at", "performed_at"),
        ("created_at", "created_at"),
        ("weight", "weight"),
        ("sets", "sets"),
        ("reps", "reps"),
    ];
    const DEFAULT_SORT: &'static str = "performed_at";
    const DEFAULT_DIRECTION: SortDirection = SortDirection::Desc;
}

impl UserExerciseHistoryRepository {
    /// Page through the caller's entries for one exercise configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_for_user_exercise(
        &self,
        scope: &Scope,
        user_exercise_id: Uuid,
        request: &QueryRequest,
    ) -> AppResult<PagedResult<UserExerciseHistory>> {
        PagedQuery::<Self>::new(scope, request)
            .filter_eq("user_exercise_id", user_exercise_id)
            .fetch(&self.pool, Self::from_row)
            .await
    }

    /// Page through the caller's entries recorded in one session
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_for_session(
        &self,
        scope: &Scope,
        workout_session_id: Uuid,
        request: &QueryRequest,
    ) -> AppResult<PagedResult<UserExerciseHistory>> {
        PagedQuery::<Self>::new(scope, request)
            .filter_eq("workout_session_id", workout_session_id)
            .fetch(&self.pool, Self::from_row)
            .await
    }

    async fn check_references(
        &self,
        user_id: Uuid,
        input: &UserExerciseHistoryInput,
    ) -> AppResult<()> {
        ensure_owned_reference(
            &self.pool,
            "user_exercises",
            "user_exercise_id",
            input.user_exercise_id,
            user_id,
        )
        .await?;
        if let Some(session_id) = input.workout_session_id {
            ensure_owned_reference(
                &self.pool,
                "workout_sessions",
                "workout_session_id",
                session_id,
                user_id,
            )
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for UserExerciseHistoryRepository {
    type Entity = UserExerciseHistory;
    type Input = UserExerciseHistoryInput;

    const RESOURCE: &'static str = resources::USER_EXERCISE_HISTORY;
    const OWNERSHIP: Ownership = Ownership::Owned;

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn from_row(row: &SqliteRow) -> AppResult<UserExerciseHistory> {
        Ok(UserExerciseHistory {
            meta: read_meta(row)?,
            user_id: get_uuid(row, "user_id")?,
            user_exercise_id: get_uuid(row, "user_exercise_id")?,
            workout_session_id: get_optional_uuid(row, "workout_session_id")?,
            performed_at: get_timestamp(row, "performed_at")?,
            sets: get_column(row, "sets")?,
            reps: get_column(row, "reps")?,
            weight: get_column(row, "weight")?,
            rpe: get_column(row, "rpe")?,
            notes: get_column(row, "notes")?,
        })
    }

    async fn create(
        &self,
        scope: &Scope,
        input: &UserExerciseHistoryInput,
    ) -> AppResult<UserExerciseHistory> {
        let user_id = owner_of(scope)?;
        self.check_references(user_id, input).await?;

        let entry = UserExerciseHistory {
            meta: EntityMeta::fresh(),
            user_id,
            user_exercise_id: input.user_exercise_id,
            workout_session_id: input.workout_session_id,
            performed_at: input.performed_at.trunc_subsecs(6),
            sets: input.sets,
            reps: input.reps,
            weight: input.weight,
            rpe: input.rpe,
            notes: normalize_optional(input.notes.as_deref()),
        };

        sqlx::query(
            r"
            INSERT INTO user_exercise_history (
                id, user_id, user_exercise_id, workout_session_id, performed_at,
                sets, reps, weight, rpe, notes, created_at, updated_at, concurrency_stamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(entry.meta.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(entry.user_exercise_id.to_string())
        .bind(entry.workout_session_id.map(|id| id.to_string()))
        .bind(format_timestamp(entry.performed_at))
        .bind(entry.sets)
        .bind(entry.reps)
        .bind(entry.weight)
        .bind(entry.rpe)
        .bind(&entry.notes)
        .bind(format_timestamp(entry.meta.created_at))
        .bind(format_timestamp(entry.meta.updated_at))
        .bind(entry.meta.concurrency_stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Upsert))?;

        Ok(entry)
    }

    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &UserExerciseHistoryInput,
    ) -> AppResult<UserExerciseHistory> {
        let user_id = owner_of(scope)?;
        self.check_references(user_id, input).await?;

        let result = sqlx::query(
            r"
            UPDATE user_exercise_history SET
                user_exercise_id = $1, workout_session_id = $2, performed_at = $3,
                sets = $4, reps = $5, weight = $6, rpe = $7, notes = $8,
                updated_at = $9, concurrency_stamp = $10
            WHERE id = $11 AND user_id = $12 AND concurrency_stamp = $13
            ",
        )
        .bind(input.user_exercise_id.to_string())
        .bind(input.workout_session_id.map(|id| id.to_string()))
        .bind(format_timestamp(input.performed_at))
        .bind(input.sets)
        .bind(input.reps)
        .bind(input.weight)
        .bind(input.rpe)
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
