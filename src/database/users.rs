// ABOUTME: User storage keyed by the identity provider's subject claim
// ABOUTME: Provisions users on first authenticated request and updates their profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_timestamp, get_column, read_meta};
use crate::auth::Principal;
use crate::constants::resources;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::{normalize_optional, EntityMeta, UpdateProfileInput, User, WeightUnit};

const USER_COLUMNS: &str = "id, created_at, updated_at, concurrency_stamp, subject, email, \
                            display_name, preferred_weight_unit";

/// User database operations manager
pub struct UserManager {
    pool: SqlitePool,
}

impl UserManager {
    /// Create a new user manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up a user by identity provider subject
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn find_by_subject(&self, subject: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE subject = $1"))
            .bind(subject)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by subject: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Return the user for `principal`, creating it on first sight
    ///
    /// Two first requests racing for the same subject both end up with the
    /// row the winner inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn provision(&self, principal: &Principal) -> AppResult<User> {
        if let Some(user) = self.find_by_subject(&principal.subject).await? {
            return Ok(user);
        }

        let user = User {
            meta: EntityMeta::fresh(),
            subject: principal.subject.clone(),
            email: normalize_optional(principal.email.as_deref()),
            display_name: normalize_optional(principal.name.as_deref()),
            preferred_weight_unit: WeightUnit::default(),
        };

        let inserted = sqlx::query(
            r"
            INSERT INTO users (
                id, subject, email, display_name, preferred_weight_unit,
                created_at, updated_at, concurrency_stamp
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.meta.id.to_string())
        .bind(&user.subject)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.preferred_weight_unit.as_str())
        .bind(format_timestamp(user.meta.created_at))
        .bind(format_timestamp(user.meta.updated_at))
        .bind(user.meta.concurrency_stamp.to_string())
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => {
                AppLogger::log_user_provisioned(user.meta.id, &user.subject);
                Ok(user)
            }
            Err(error)
                if error
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation()) =>
            {
                self.find_by_subject(&principal.subject)
                    .await?
                    .ok_or_else(|| AppError::internal("User vanished during provisioning"))
            }
            Err(error) => Err(AppError::from(error)),
        }
    }

    /// Replace the caller's profile preferences, conditional on the stamp
    ///
    /// # Errors
    ///
    /// Returns `CONCURRENCY_CONFLICT` if `stamp` is stale
    pub async fn update_profile(
        &self,
        id: Uuid,
        stamp: Uuid,
        input: &UpdateProfileInput,
    ) -> AppResult<User> {
        let result = sqlx::query(
            r"
            UPDATE users SET
                display_name = $1, preferred_weight_unit = $2,
                updated_at = $3, concurrency_stamp = $4
            WHERE id = $5 AND concurrency_stamp = $6
            ",
        )
        .bind(normalize_optional(input.display_name.as_deref()))
        .bind(input.preferred_weight_unit.as_str())
        .bind(format_timestamp(Utc::now()))
        .bind(Uuid::new_v4().to_string())
        .bind(id.to_string())
        .bind(stamp.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update user: {e}")))?;

        let user = self.get(id).await?;
        match (result.rows_affected(), user) {
            (0, Some(_)) => Err(AppError::concurrency_conflict(resources::USER)),
            (_, Some(user)) => Ok(user),
            (_, None) => Err(AppError::not_found(resources::USER)),
        }
    }
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let unit: String = get_column(row, "preferred_weight_unit")?;
    Ok(User {
        meta: read_meta(row)?,
        subject: get_column(row, "subject")?,
        email: get_column(row, "email")?,
        display_name: get_column(row, "display_name")?,
        preferred_weight_unit: WeightUnit::parse(&unit),
    })
}
