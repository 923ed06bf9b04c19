// ABOUTME: Database operations for muscle groups (shared reference data)
// ABOUTME: Rows describe chest, hamstrings and the like
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::named::{self, NamedRow};
use super::query::QuerySpec;
use super::repository::{Ownership, Repository, Scope};
use crate::constants::resources;
use crate::errors::AppResult;
use crate::models::{MuscleGroup, NamedEntityInput};

/// MuscleGroup database operations manager
pub struct MuscleGroupRepository {
    pool: SqlitePool,
}

impl QuerySpec for MuscleGroupRepository {
    const TABLE: &'static str = "muscle_groups";
    const COLUMNS: &'static str = named::COLUMNS;
    const SEARCH_COLUMNS: &'static [&'static str] = named::SEARCH_COLUMNS;
    const SORT_FIELDS: &'static [(&'static str, &'static str)] = named::SORT_FIELDS;
    const DEFAULT_SORT: &'static str = "name";
}

impl From<NamedRow> for MuscleGroup {
    fn from(row: NamedRow) -> Self {
        Self {
            meta: row.meta,
            name: row.name,
            description: row.description,
        }
    }
}

#[async_trait]
impl Repository for MuscleGroupRepository {
    type Entity = MuscleGroup;
    type Input = NamedEntityInput;

    const RESOURCE: &'static str = resources::MUSCLE_GROUP;
    const OWNERSHIP: Ownership = Ownership::Shared;

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn from_row(row: &SqliteRow) -> AppResult<MuscleGroup> {
        named::read_named(row).map(Into::into)
    }

    async fn create(&self, _scope: &Scope, input: &NamedEntityInput) -> AppResult<MuscleGroup> {
        named::insert(self, input).await.map(Into::into)
    }

    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &NamedEntityInput,
    ) -> AppResult<MuscleGroup> {
        named::update(self, scope, id, stamp, input).await
    }
}
