// ABOUTME: Shared storage for reference entities that are only a unique name and description
// ABOUTME: Used by muscle groups, muscle functions and equipment groups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::repository::{missed_write, Repository, Scope};
use super::{format_timestamp, get_column, read_meta};
use crate::errors::{AppError, AppResult, WriteKind};
use crate::models::{normalize_optional, EntityMeta, NamedEntityInput};

/// Select list of a named table
pub const COLUMNS: &str = "id, created_at, updated_at, concurrency_stamp, name, description";
/// Searchable columns of a named table
pub const SEARCH_COLUMNS: &[&str] = &["name", "description"];
/// Sortable fields of a named table
pub const SORT_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("created_at", "created_at"),
    ("updated_at", "updated_at"),
];

/// Decoded columns of a named table
pub struct NamedRow {
    pub meta: EntityMeta,
    pub name: String,
    pub description: Option<String>,
}

pub fn read_named(row: &SqliteRow) -> AppResult<NamedRow> {
    Ok(NamedRow {
        meta: read_meta(row)?,
        name: get_column(row, "name")?,
        description: get_column(row, "description")?,
    })
}

pub async fn insert<R: Repository>(repo: &R, input: &NamedEntityInput) -> AppResult<NamedRow> {
    let row = NamedRow {
        meta: EntityMeta::fresh(),
        name: input.name.trim().to_owned(),
        description: normalize_optional(input.description.as_deref()),
    };

    sqlx::query(&format!(
        "INSERT INTO {} (id, name, description, created_at, updated_at, concurrency_stamp)
         VALUES ($1, $2, $3, $4, $5, $6)",
        R::TABLE
    ))
    .bind(row.meta.id.to_string())
    .bind(&row.name)
    .bind(&row.description)
    .bind(format_timestamp(row.meta.created_at))
    .bind(format_timestamp(row.meta.updated_at))
    .bind(row.meta.concurrency_stamp.to_string())
    .execute(repo.pool())
    .await
    .map_err(|e| AppError::from_write(e, R::RESOURCE, WriteKind::Upsert))?;

    Ok(row)
}

pub async fn update<R: Repository>(
    repo: &R,
    scope: &Scope,
    id: Uuid,
    stamp: Uuid,
    input: &NamedEntityInput,
) -> AppResult<R::Entity> {
    let result = sqlx::query(&format!(
        "UPDATE {} SET name = $1, description = $2, updated_at = $3, concurrency_stamp = $4
         WHERE id = $5 AND concurrency_stamp = $6",
        R::TABLE
    ))
    .bind(input.name.trim())
    .bind(normalize_optional(input.description.as_deref()))
    .bind(format_timestamp(Utc::now()))
    .bind(Uuid::new_v4().to_string())
    .bind(id.to_string())
    .bind(stamp.to_string())
    .execute(repo.pool())
    .await
    .map_err(|e| AppError::from_write(e, R::RESOURCE, WriteKind::Upsert))?;

    if result.rows_affected() == 0 {
        return Err(missed_write::<R>(repo.pool(), scope, id).await);
    }
    repo.reload(scope, id).await
}
