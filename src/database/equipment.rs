// ABOUTME: Database operations for equipment (shared reference data)
// ABOUTME: Equipment optionally belongs to an equipment group and can be listed per group
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
use super::{format_timestamp, get_column, get_optional_uuid, read_meta};
use crate::constants::resources;
use crate::errors::{AppError, AppResult, WriteKind};
use crate::models::{normalize_optional, EntityMeta, Equipment, EquipmentInput};
use crate::pagination::{PagedResult, QueryRequest};

/// Equipment database operations manager
pub struct EquipmentRepository {
    pool: SqlitePool,
}

impl QuerySpec for EquipmentRepository {
    const TABLE: &'static str = "equipment";
    const COLUMNS: &'static str =
        "id, created_at, updated_at, concurrency_stamp, name, description, equipment_group_id";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "description"];
    const SORT_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
    ];
    const DEFAULT_SORT: &'static str = "name";
}

impl EquipmentRepository {
    /// Page through the equipment belonging to one group
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_by_group(
        &self,
        group_id: Uuid,
        request: &QueryRequest,
    ) -> AppResult<PagedResult<Equipment>> {
        PagedQuery::<Self>::new(&Scope::Shared, request)
            .filter_eq("equipment_group_id", group_id)
            .fetch(&self.pool, Self::from_row)
            .await
    }
}

#[async_trait]
impl Repository for EquipmentRepository {
    type Entity = Equipment;
    type Input = EquipmentInput;

    const RESOURCE: &'static str = resources::EQUIPMENT;
    const OWNERSHIP: Ownership = Ownership::Shared;

    fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn from_row(row: &SqliteRow) -> AppResult<Equipment> {
        Ok(Equipment {
            meta: read_meta(row)?,
            name: get_column(row, "name")?,
            description: get_column(row, "description")?,
            equipment_group_id: get_optional_uuid(row, "equipment_group_id")?,
        })
    }

    async fn create(&self, _scope: &Scope, input: &EquipmentInput) -> AppResult<Equipment> {
        let equipment = Equipment {
            meta: EntityMeta::fresh(),
            name: input.name.trim().to_owned(),
            description: normalize_optional(input.description.as_deref()),
            equipment_group_id: input.equipment_group_id,
        };

        sqlx::query(
            r"
            INSERT INTO equipment (id, name, description, equipment_group_id, created_at, updated_at, concurrency_stamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(equipment.meta.id.to_string())
        .bind(&equipment.name)
        .bind(&equipment.description)
        .bind(equipment.equipment_group_id.map(|id| id.to_string()))
        .bind(format_timestamp(equipment.meta.created_at))
        .bind(format_timestamp(equipment.meta.updated_at))
        .bind(equipment.meta.concurrency_stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, Self::RESOURCE, WriteKind::Upsert))?;

        Ok(equipment)
    }

    async fn update(
        &self,
        scope: &Scope,
        id: Uuid,
        stamp: Uuid,
        input: &EquipmentInput,
    ) -> AppResult<Equipment> {
        let result = sqlx::query(
            r"
            UPDATE equipment SET
                name = $1, description = $2, equipment_group_id = $3,
                updated_at = $4, concurrency_stamp = $5
            WHERE id = $6 AND concurrency_stamp = $7
            ",
        )
        .bind(input.name.trim())
        .bind(normalize_optional(input.description.as_deref()))
        .bind(input.equipment_group_id.map(|id| id.to_string()))
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
