// ABOUTME: Database operations for workout sessions owned by a user
// ABOUTME: Includes the conditional completion of a session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::query::QuerySpec;
use super::repository::{missed_write, owner_of, Ownership, Repository, Scope};
use super::{
    format_timestamp, get_column, get_optional_timestamp, get_timestamp, get_uuid, read_meta,
};
use crate::constants::resources;
use crate::errors::{AppError, AppResult, ErrorCode, FieldError, WriteKind};
use crate::models::{normalize_optional, EntityMeta, WorkoutSession, WorkoutSessionInput};
use crate::pagination::SortDirection;

/// Workout session database operations manager
pub struct WorkoutSessionRepository {
    pool: SqlitePool,
}

impl QuerySpec for WorkoutSessionRepository {
    const TABLE: &'static str = "workout_sessions";
    const COLUMNS: &'static str = "id, created_at, updated_at, concurrency_stamp, user_id, \
                                   name, started_at, completed_at, notes";
    const OWNER_COLUMN: Option<&'static str> = Some("user_id");
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "notes"];
    const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("started_at", "started_at"),
        ("completed_at", "completed_at"),
        ("name", "name"),
        ("created_at", "created_at"),
    ];
    const DEFAULT_SORT: &'static str = "started_at";
    const DEFAULT_DIRECTION: SortDirection = SortDirection::Desc;
}

impl WorkoutSessionRepository {
    /// Mark a session completed, conditional on its concurrency stamp
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the session is not the caller's,
    /// `CONCURRENCY_CONFLICT` if it is already completed or `stamp` is stale,
    /// and `VALIDATION_FAILED` if `completed_at` precedes the start
    pub async fn complete(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        completed_at: Option<DateTime<Utc>>,
    ) -> AppResult<WorkoutSession> {
        let user_id = owner_of(scope)?;
        let session = self
            .get(scope, id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::RESOURCE))?;

        if session.is_completed() {
            return Err(AppError::new(
                ErrorCode::ConcurrencyConflict,
                "Workout session is already completed",
            ));
        }

        let completed_at = completed_at.unwrap_or_else(Utc::now).trunc_subsecs(6);
        if completed_at < session.started_at {
            return Err(AppError::validation(vec![FieldError::new(
                "completed_at",
                "must not be earlier than started_at",
            )]));
        }

        let result = sqlx::query(
            r"
            UPDATE workout_sessions SET
                completed_at = $1, updated_at = $2, concurrency_stamp = $3
            WHERE id = $4 AND user_id = $5 AND concurrency_stamp = $6 AND completed_at IS NULL
            ",
        )
        .bind(format_timestamp(completed_at))
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

#[async_trait]
impl Repository for WorkoutSessionRepository {
    type Entity = WorkoutSession;
    type Input = WorkoutSessionInput;

    const RESOURCE: &'static str = resources::WORKOUT_SESSION;
    const OWNERSHIP: Ownership = Ownership::Owned;

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn from_row(row: &SqliteRow) -> AppResult<WorkoutSession> {
        Ok(WorkoutSession {
            meta: read_meta(row)?,
            user_id: get_uuid(row, "user_id")?,
            name: get_column(row, "name")?,
            started_at: get_timestamp(row, "started_at")?,
            completed_at: get_optional_timestamp(row, "completed_at")?,
            notes: get_column(row, "notes")?,
        })
    }

    async fn create(&self, scope: &Scope, input: &WorkoutSessionInput) -> AppResult<WorkoutSession> {
        let session = WorkoutSession {
            meta: EntityMeta::fresh(),
            user_id: owner_of(scope)?,
            name: input.name.trim().to_owned(),
            started_at: input.started_at.trunc_subsecs(6),
            completed_at: input.completed_at.map(|at| at.trunc_subsecs(6)),
            notes: normalize_optional(input.notes.as_deref()),
        };

        sqlx::query(
            r"
            INSERT INTO workout_sessions (
                id, user_id, name, started_at, completed_at, notes,
                created_at, updated_at, concurrency_stamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(session.meta.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.name)
        .bind(format_timestamp(session.started_at))
        .bind(session.completed_at.map(format_timestamp))
        .bind(&session.notes)
        .bind(format_timestamp(session.meta.created_at))
        .bind(format_timestamp(session.meta.updated_at))
        .bind(session.meta.concurrency_stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Upsert))?;

        Ok(session)
    }

    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &WorkoutSessionInput,
    ) -> AppResult<WorkoutSession> {
        let user_id = owner_of(scope)?;
        let result = sqlx::query(
            r"
            UPDATE workout_sessions SET
                name = $1, started_at = $2, completed_at = $3, notes = $4,
                updated_at = $5, concurrency_stamp = $6
            WHERE id = $7 AND user_id = $8 AND concurrency_stamp = $9
            ",
        )
        .bind(input.name.trim())
        .bind(format_timestamp(input.started_at))
        .bind(input.completed_at.map(format_timestamp))
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
