// ABOUTME: User-owned training records: exercise configuration, history and sessions
// ABOUTME: Validation rules for sets, reps, weights and session timing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityMeta;
use crate::constants::text::{NAME_MAX, NOTES_MAX};
use crate::constants::training::{
    REPS_MAX, RPE_MAX, RPE_MIN, SETS_MAX, SETS_MIN, TARGET_REPS_MIN,
};
use crate::errors::FieldError;
use crate::validation::{FieldErrors, Validate};

/// A user's configuration for one exercise type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExercise {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Owning user
    pub user_id: Uuid,
    /// Exercise configured
    pub exercise_type_id: Uuid,
    /// Equipment normally used
    pub equipment_id: Option<Uuid>,
    /// Planned sets
    pub target_sets: Option<i64>,
    /// Planned reps per set
    pub target_reps: Option<i64>,
    /// Planned working weight
    pub target_weight: Option<f64>,
    /// Weight added when progressing
    pub weight_increment: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Create/update payload for [`UserExercise`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExerciseInput {
    /// Exercise configured
    pub exercise_type_id: Uuid,
    /// Equipment normally used
    #[serde(default)]
    pub equipment_id: Option<Uuid>,
    /// Planned sets
    #[serde(default)]
    pub target_sets: Option<i64>,
    /// Planned reps per set
    #[serde(default)]
    pub target_reps: Option<i64>,
    /// Planned working weight
    #[serde(default)]
    pub target_weight: Option<f64>,
    /// Weight added when progressing
    #[serde(default)]
    pub weight_increment: Option<f64>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for UserExerciseInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_id("exercise_type_id", self.exercise_type_id)
            .optional_id("equipment_id", self.equipment_id)
            .optional_int_range("target_sets", self.target_sets, SETS_MIN, SETS_MAX)
            .optional_int_range("target_reps", self.target_reps, TARGET_REPS_MIN, REPS_MAX)
            .optional_non_negative("target_weight", self.target_weight)
            .optional_non_negative("weight_increment", self.weight_increment)
            .optional_text("notes", self.notes.as_deref(), NOTES_MAX)
            .finish()
    }
}

/// One performed exercise entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExerciseHistory {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Owning user
    pub user_id: Uuid,
    /// Exercise configuration the entry belongs to
    pub user_exercise_id: Uuid,
    /// Session the entry was recorded in
    pub workout_session_id: Option<Uuid>,
    /// When the exercise was performed
    pub performed_at: DateTime<Utc>,
    /// Sets completed
    pub sets: i64,
    /// Reps per set
    pub reps: i64,
    /// Weight used
    pub weight: f64,
    /// Rate of perceived exertion
    pub rpe: Option<i64>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Create/update payload for [`UserExerciseHistory`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExerciseHistoryInput {
    /// Exercise configuration the entry belongs to
    pub user_exercise_id: Uuid,
    /// Session the entry was recorded in
    #[serde(default)]
    pub workout_session_id: Option<Uuid>,
    /// When the exercise was performed
    pub performed_at: DateTime<Utc>,
    /// Sets completed
    pub sets: i64,
    /// Reps per set
    pub reps: i64,
    /// Weight used
    #[serde(default)]
    pub weight: f64,
    /// Rate of perceived exertion
    #[serde(default)]
    pub rpe: Option<i64>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for UserExerciseHistoryInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_id("user_exercise_id", self.user_exercise_id)
            .optional_id("workout_session_id", self.workout_session_id)
            .int_range("sets", self.sets, SETS_MIN, SETS_MAX)
            .int_range("reps", self.reps, 0, REPS_MAX)
            .non_negative("weight", self.weight)
            .optional_int_range("rpe", self.rpe, RPE_MIN, RPE_MAX)
            .optional_text("notes", self.notes.as_deref(), NOTES_MAX)
            .finish()
    }
}

/// A training session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Owning user
    pub user_id: Uuid,
    /// Session name
    pub name: String,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session was finished
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl WorkoutSession {
    /// Whether the session has been completed
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Create/update payload for [`WorkoutSession`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSessionInput {
    /// Session name
    pub name: String,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session was finished
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for WorkoutSessionInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_text("name", &self.name, NAME_MAX)
            .not_before("completed_at", self.completed_at, self.started_at, "started_at")
            .optional_text("notes", self.notes.as_deref(), NOTES_MAX)
            .finish()
    }
}

/// Body of the complete-session operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteSessionInput {
    /// Stamp the completion is conditional on
    pub concurrency_stamp: Uuid,
    /// Completion time; defaults to now
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Validate for CompleteSessionInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_id("concurrency_stamp", self.concurrency_stamp)
            .finish()
    }
}
