// ABOUTME: Generic repository contract implemented by every CRUD entity
// ABOUTME: Scoped get/list/delete defaults plus optimistic-concurrency write resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::query::{PagedQuery, QuerySpec};
use crate::errors::{AppError, AppResult, WriteKind};
use crate::pagination::{PagedResult, QueryRequest};
use crate::validation::Validate;

/// Tenancy restriction applied to every statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Reference data visible to every caller
    Shared,
    /// Rows owned by one user
    Owner(Uuid),
}

/// Whether an entity is shared reference data or owned by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Readable by everyone, writable by administrators
    Shared,
    /// Visible and writable only by the owning user
    Owned,
}

/// CRUD storage for one entity type
///
/// Reads and deletes are provided from the [`QuerySpec`]; each entity writes
/// its own insert and update statements.
#[async_trait]
pub trait Repository: QuerySpec + Send + Sync + Sized + 'static {
    /// Stored record
    type Entity: Serialize + Debug + Send + Sync + 'static;
    /// Create/update payload
    type Input: Validate + DeserializeOwned + Debug + Send + Sync + 'static;

    /// Public resource name used in error messages
    const RESOURCE: &'static str;
    /// Tenancy model
    const OWNERSHIP: Ownership;

    /// Create a repository over `pool`
    fn new(pool: SqlitePool) -> Self;

    /// Pool the repository runs against
    fn pool(&self) -> &SqlitePool;

    /// Decode a row selected with [`QuerySpec::COLUMNS`]
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing or malformed
    fn from_row(row: &SqliteRow) -> AppResult<Self::Entity>;

    /// Fetch one row visible in `scope`
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    async fn get(&self, scope: &Scope, id: Uuid) -> AppResult<Option<Self::Entity>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} WHERE id = ",
            Self::COLUMNS,
            Self::TABLE
        ));
        builder.push_bind(id.to_string());
        push_owner::<Self>(&mut builder, scope);

        let row = builder
            .build()
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get {}: {e}", Self::TABLE)))?;

        row.as_ref().map(Self::from_row).transpose()
    }

    /// Fetch a page of rows visible in `scope`
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    async fn list(
        &self,
        scope: &Scope,
        request: &QueryRequest,
    ) -> AppResult<PagedResult<Self::Entity>> {
        PagedQuery::<Self>::new(scope, request)
            .fetch(self.pool(), Self::from_row)
            .await
    }

    /// Insert a new row
    ///
    /// # Errors
    ///
    /// Returns an error on constraint violations or database failures
    async fn create(&self, scope: &Scope, input: &Self::Input) -> AppResult<Self::Entity>;

    /// Replace a row, conditional on its concurrency stamp
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the row is not visible in `scope`,
    /// `CONCURRENCY_CONFLICT` if `stamp` is stale, or a constraint error
    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &Self::Input,
    ) -> AppResult<Self::Entity>;

    /// Delete a row, optionally conditional on its concurrency stamp
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND`, `CONCURRENCY_CONFLICT` or
    /// `RESOURCE_IN_USE` when other rows still reference it
    async fn delete(&self, scope: &Scope, id: Uuid, stamp: Option<Uuid>) -> AppResult<()> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("DELETE FROM {} WHERE id = ", Self::TABLE));
        builder.push_bind(id.to_string());
        push_owner::<Self>(&mut builder, scope);
        if let Some(stamp) = stamp {
            builder.push(" AND concurrency_stamp = ");
            builder.push_bind(stamp.to_string());
        }

        let result = builder
            .build()
            .execute(self.pool())
            .await
            .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Delete))?;

        if result.rows_affected() == 0 {
            return Err(missed_write::<Self>(self.pool(), scope, id).await);
        }
        Ok(())
    }

    /// Re-read a row after a successful write
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the row vanished in between
    async fn reload(&self, scope: &Scope, id: Uuid) -> AppResult<Self::Entity> {
        self.get(scope, id)
            .await?
            .ok_or_else(|| AppError::not_found(Self::RESOURCE))
    }
}

/// Append the owner restriction for user-owned tables
pub fn push_owner<S: QuerySpec>(builder: &mut QueryBuilder<'_, Sqlite>, scope: &Scope) {
    if let (Scope::Owner(user_id), Some(column)) = (scope, S::OWNER_COLUMN) {
        builder.push(format!(" AND {column} = "));
        builder.push_bind(user_id.to_string());
    }
}

/// Whether a row with `id` is visible in `scope`
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn exists<S: QuerySpec>(pool: &SqlitePool, scope: &Scope, id: Uuid) -> AppResult<bool> {
    let mut builder =
        QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {} WHERE id = ", S::TABLE));
    builder.push_bind(id.to_string());
    push_owner::<S>(&mut builder, scope);

    let count: i64 = builder
        .build_query_scalar()
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check {}: {e}", S::TABLE)))?;
    Ok(count > 0)
}

/// Explain a conditional write that touched no rows
///
/// A row that is still visible means the stamp was stale; otherwise the row
/// does not exist for this caller.
pub async fn missed_write<R: Repository>(pool: &SqlitePool, scope: &Scope, id: Uuid) -> AppError {
    match exists::<R>(pool, scope, id).await {
        Ok(true) => AppError::concurrency_conflict(R::RESOURCE),
        Ok(false) => AppError::not_found(R::RESOURCE),
        Err(error) => error,
    }
}

/// Require that `id` in `table` belongs to `user_id`
///
/// User-owned rows may only reference the same user's rows; a reference to
/// another user's row is reported exactly like a reference to a missing one.
///
/// # Errors
///
/// Returns `INVALID_REFERENCE` naming `field` when the row is not owned by the user
pub async fn ensure_owned_reference(
    pool: &SqlitePool,
    table: &'static str,
    field: &str,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {table} WHERE id = $1 AND user_id = $2"
    ))
    .bind(id.to_string())
    .bind(user_id.to_string())
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::database(format!("Failed to check {table}: {e}")))?;

    if count == 0 {
        return Err(AppError::invalid_reference(format!(
            "{field} does not refer to an existing record"
        )));
    }
    Ok(())
}

/// Owner id for writes to user-owned tables
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` when called with the shared scope
pub fn owner_of(scope: &Scope) -> AppResult<Uuid> {
    match scope {
        Scope::Owner(user_id) => Ok(*user_id),
        Scope::Shared => Err(AppError::permission_denied(
            "User-owned records require an owner scope",
        )),
    }
}
