// ABOUTME: Entity models for reference data and user-owned training records
// ABOUTME: Shared metadata (identity, timestamps, concurrency stamp) and request inputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

//! Entity models
//!
//! Every persisted record carries [`EntityMeta`]: a UUID identity, creation
//! and update timestamps, and an optimistic-concurrency stamp that changes on
//! every write. Create and update requests share one input type per entity;
//! updates wrap it in [`Versioned`] to carry the stamp the client last saw.

/// Equipment and equipment groups
pub mod equipment;
/// Exercise types, muscle groups, muscle functions and their join
pub mod exercise;
/// Users provisioned from identity claims
pub mod user;
/// Per-user exercise configuration, history and workout sessions
pub mod workout;

pub use equipment::{Equipment, EquipmentGroup, EquipmentInput};
pub use exercise::{
    ExerciseMuscleGroup, ExerciseMuscleGroupDetail, ExerciseMuscleGroupInput, ExerciseType,
    ExerciseTypeInput, MuscleFunction, MuscleGroup, NamedEntityInput, NamedRef,
};
pub use user::{UpdateProfileInput, User, WeightUnit};
pub use workout::{
    CompleteSessionInput, UserExercise, UserExerciseHistory, UserExerciseHistoryInput,
    UserExerciseInput, WorkoutSession, WorkoutSessionInput,
};

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FieldError;
use crate::validation::{FieldErrors, Validate};

/// Identity, timestamps and concurrency stamp shared by every entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    /// Unique identifier
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency token, regenerated on every write
    pub concurrency_stamp: Uuid,
}

impl EntityMeta {
    /// Metadata for a row about to be inserted
    ///
    /// Timestamps are truncated to the microsecond precision they are stored at.
    #[must_use]
    pub fn fresh() -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            concurrency_stamp: Uuid::new_v4(),
        }
    }
}

/// An input together with the concurrency stamp the client last read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// Stamp the update is conditional on
    pub concurrency_stamp: Uuid,
    /// Replacement values
    #[serde(flatten)]
    pub input: T,
}

impl<T: Validate> Validate for Versioned<T> {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::new();
        errors.required_id("concurrency_stamp", self.concurrency_stamp);
        let mut all = errors.finish();
        all.extend(self.input.validate());
        all
    }
}

/// Trim a text field and drop it when blank
#[must_use]
pub fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
