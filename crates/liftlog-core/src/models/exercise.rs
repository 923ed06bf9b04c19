// ABOUTME: Exercise reference data: exercise types, muscle groups and muscle functions
// ABOUTME: Includes the exercise-to-muscle-group join with its validation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityMeta;
use crate::constants::text::{DESCRIPTION_MAX, INSTRUCTIONS_MAX, NAME_MAX};
use crate::errors::FieldError;
use crate::validation::{FieldErrors, Validate};

/// A kind of exercise (bench press, deadlift, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseType {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Unique display name
    pub name: String,
    /// Short description
    pub description: Option<String>,
    /// How to perform the exercise
    pub instructions: Option<String>,
}

/// Create/update payload for [`ExerciseType`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseTypeInput {
    /// Unique display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// How to perform the exercise
    #[serde(default)]
    pub instructions: Option<String>,
}

impl Validate for ExerciseTypeInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_text("name", &self.name, NAME_MAX)
            .optional_text("description", self.description.as_deref(), DESCRIPTION_MAX)
            .optional_text("instructions", self.instructions.as_deref(), INSTRUCTIONS_MAX)
            .finish()
    }
}

/// A muscle group (chest, hamstrings, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroup {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Unique display name
    pub name: String,
    /// Short description
    pub description: Option<String>,
}

/// The role a muscle plays in an exercise (primary, secondary, stabilizer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleFunction {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Unique display name
    pub name: String,
    /// Short description
    pub description: Option<String>,
}

/// Create/update payload for entities that are only a name and description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedEntityInput {
    /// Unique display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for NamedEntityInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_text("name", &self.name, NAME_MAX)
            .optional_text("description", self.description.as_deref(), DESCRIPTION_MAX)
            .finish()
    }
}

/// Links an exercise type to a muscle group it works, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseMuscleGroup {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Exercise being described
    pub exercise_type_id: Uuid,
    /// Muscle group worked
    pub muscle_group_id: Uuid,
    /// Role of the muscle group in the exercise
    pub muscle_function_id: Uuid,
}

/// Create/update payload for [`ExerciseMuscleGroup`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseMuscleGroupInput {
    /// Exercise being described
    pub exercise_type_id: Uuid,
    /// Muscle group worked
    pub muscle_group_id: Uuid,
    /// Role of the muscle group in the exercise
    pub muscle_function_id: Uuid,
}

impl Validate for ExerciseMuscleGroupInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_id("exercise_type_id", self.exercise_type_id)
            .required_id("muscle_group_id", self.muscle_group_id)
            .required_id("muscle_function_id", self.muscle_function_id)
            .finish()
    }
}

/// Identifier and name of a related entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Related entity id
    pub id: Uuid,
    /// Related entity name
    pub name: String,
}

/// A muscle group worked by an exercise, resolved with its function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseMuscleGroupDetail {
    /// Id of the underlying join row
    pub id: Uuid,
    /// Muscle group worked
    pub muscle_group: NamedRef,
    /// Role of the muscle group
    pub muscle_function: NamedRef,
}
