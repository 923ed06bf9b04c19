// ABOUTME: SQLite connection pool, idempotent schema creation and row decoding helpers
// ABOUTME: Hosts the generic query builder and one repository per persisted entity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! # Database Management
//!
//! Every entity lives in its own table keyed by a UUID stored as text.
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order equals chronological order.
//! Foreign keys are enforced on every connection.

/// Equipment repository
pub mod equipment;
/// Equipment group repository
pub mod equipment_groups;
/// Exercise/muscle group link repository
pub mod exercise_muscle_groups;
/// Exercise type repository
pub mod exercise_types;
/// Muscle function repository
pub mod muscle_functions;
/// Muscle group repository
pub mod muscle_groups;
/// Filter/sort/page query builder
pub mod query;
/// Generic repository contract and tenancy scope
pub mod repository;
/// Shared storage for name-and-description tables
mod named;
/// Performed exercise history repository
pub mod user_exercise_history;
/// Per-user exercise configuration repository
pub mod user_exercises;
/// User provisioning and profile storage
pub mod users;
/// Workout session repository
pub mod workout_sessions;

pub use equipment::EquipmentRepository;
pub use equipment_groups::EquipmentGroupRepository;
pub use exercise_muscle_groups::ExerciseMuscleGroupRepository;
pub use exercise_types::ExerciseTypeRepository;
pub use muscle_functions::MuscleFunctionRepository;
pub use muscle_groups::MuscleGroupRepository;
pub use query::{PagedQuery, QuerySpec};
pub use repository::{Ownership, Repository, Scope};
pub use user_exercise_history::UserExerciseHistoryRepository;
pub use user_exercises::UserExerciseRepository;
pub use users::UserManager;
pub use workout_sessions::WorkoutSessionRepository;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};
use crate::models::EntityMeta;

/// Seconds a connection waits on a locked database before failing
const BUSY_TIMEOUT_SECS: u64 = 5;

/// Connection pool plus schema management
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect, creating the database file if needed, and apply the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or the
    /// schema cannot be created
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let url = config.url.to_connection_string();
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL {url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

        // Every in-memory connection is a separate database, so pin exactly one
        let pool_options = if config.url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            if let DatabaseUrl::SQLite { path } = &config.url {
                ensure_parent_dir(path)?;
            }
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {url}: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;
        info!(database = %config.url, "Database ready");
        Ok(database)
    }

    /// Open a private in-memory database with the schema applied
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created
    pub async fn in_memory() -> AppResult<Self> {
        Self::connect(&DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 1,
        })
        .await
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Repository for entity `R` over this pool
    #[must_use]
    pub fn repository<R: Repository>(&self) -> R {
        R::new(self.pool.clone())
    }

    /// User storage over this pool
    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(self.pool.clone())
    }

    /// Round-trip a trivial query to prove the database is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Create all tables and indexes that do not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_reference_data().await?;
        self.migrate_users().await?;
        self.migrate_training_records().await?;
        debug!("Database schema is up to date");
        Ok(())
    }

    async fn execute_all(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_reference_data(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS exercise_types (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE,
                description TEXT,
                instructions TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS muscle_groups (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS muscle_functions (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS equipment_groups (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS equipment (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE,
                description TEXT,
                equipment_group_id TEXT REFERENCES equipment_groups(id) ON DELETE RESTRICT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_equipment_group ON equipment(equipment_group_id)",
            r"
            CREATE TABLE IF NOT EXISTS exercise_muscle_groups (
                id TEXT PRIMARY KEY,
                exercise_type_id TEXT NOT NULL REFERENCES exercise_types(id) ON DELETE CASCADE,
                muscle_group_id TEXT NOT NULL REFERENCES muscle_groups(id) ON DELETE RESTRICT,
                muscle_function_id TEXT NOT NULL REFERENCES muscle_functions(id) ON DELETE RESTRICT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL,
                UNIQUE (exercise_type_id, muscle_group_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_emg_muscle_group ON exercise_muscle_groups(muscle_group_id)",
            "CREATE INDEX IF NOT EXISTS idx_emg_muscle_function ON exercise_muscle_groups(muscle_function_id)",
        ])
        .await
    }

    async fn migrate_users(&self) -> AppResult<()> {
        self.execute_all(&[r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                subject TEXT NOT NULL UNIQUE,
                email TEXT,
                display_name TEXT,
                preferred_weight_unit TEXT NOT NULL DEFAULT 'kg'
                    CHECK (preferred_weight_unit IN ('kg', 'lb')),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            "])
        .await
    }

    async fn migrate_training_records(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS user_exercises (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                exercise_type_id TEXT NOT NULL REFERENCES exercise_types(id) ON DELETE RESTRICT,
                equipment_id TEXT REFERENCES equipment(id) ON DELETE RESTRICT,
                target_sets INTEGER,
                target_reps INTEGER,
                target_weight REAL,
                weight_increment REAL,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL,
                UNIQUE (user_id, exercise_type_id)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_user_exercises_exercise_type ON user_exercises(exercise_type_id)",
            "CREATE INDEX IF NOT EXISTS idx_user_exercises_equipment ON user_exercises(equipment_id)",
            r"
            CREATE TABLE IF NOT EXISTS workout_sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                started_at TEXT NOT NULL,
                completed_at TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workout_sessions_user ON workout_sessions(user_id, started_at)",
            r"
            CREATE TABLE IF NOT EXISTS user_exercise_history (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                user_exercise_id TEXT NOT NULL REFERENCES user_exercises(id) ON DELETE CASCADE,
                workout_session_id TEXT REFERENCES workout_sessions(id) ON DELETE SET NULL,
                performed_at TEXT NOT NULL,
                sets INTEGER NOT NULL,
                reps INTEGER NOT NULL,
                weight REAL NOT NULL,
                rpe INTEGER,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                concurrency_stamp TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_history_user ON user_exercise_history(user_id, performed_at)",
            "CREATE INDEX IF NOT EXISTS idx_history_user_exercise ON user_exercise_history(user_exercise_id)",
            "CREATE INDEX IF NOT EXISTS idx_history_session ON user_exercise_history(workout_session_id)",
        ])
        .await
    }
}

fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })
        }
        _ => Ok(()),
    }
}

/// Fixed-width RFC 3339 representation used for every stored timestamp
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
///
/// # Errors
///
/// Returns an internal error if the column does not hold RFC 3339 text
pub fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid stored timestamp {value}: {e}")))
}

/// Parse a stored identifier
///
/// # Errors
///
/// Returns an internal error if the column does not hold a UUID
pub fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
}

/// Read an identifier column
///
/// # Errors
///
/// Returns an error if the column is missing or malformed
pub fn get_uuid(row: &SqliteRow, column: &str) -> AppResult<Uuid> {
    let value: String = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Failed to read {column}: {e}")))?;
    parse_uuid(&value)
}

/// Read a nullable identifier column
///
/// # Errors
///
/// Returns an error if the column is missing or malformed
pub fn get_optional_uuid(row: &SqliteRow, column: &str) -> AppResult<Option<Uuid>> {
    let value: Option<String> = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Failed to read {column}: {e}")))?;
    value.as_deref().map(parse_uuid).transpose()
}

/// Read a timestamp column
///
/// # Errors
///
/// Returns an error if the column is missing or malformed
pub fn get_timestamp(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let value: String = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Failed to read {column}: {e}")))?;
    parse_timestamp(&value)
}

/// Read a nullable timestamp column
///
/// # Errors
///
/// Returns an error if the column is missing or malformed
pub fn get_optional_timestamp(row: &SqliteRow, column: &str) -> AppResult<Option<DateTime<Utc>>> {
    let value: Option<String> = row
        .try_get(column)
        .map_err(|e| AppError::database(format!("Failed to read {column}: {e}")))?;
    value.as_deref().map(parse_timestamp).transpose()
}

/// Read any plain column
///
/// # Errors
///
/// Returns an error if the column is missing or has an incompatible type
pub fn get_column<'r, T>(row: &'r SqliteRow, column: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| AppError::database(format!("Failed to read {column}: {e}")))
}

/// Read the identity, timestamps and concurrency stamp shared by every entity
///
/// # Errors
///
/// Returns an error if any of the metadata columns is missing or malformed
pub fn read_meta(row: &SqliteRow) -> AppResult<EntityMeta> {
    Ok(EntityMeta {
        id: get_uuid(row, "id")?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
        concurrency_stamp: get_uuid(row, "concurrency_stamp")?,
    })
}
