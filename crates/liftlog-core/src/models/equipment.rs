// ABOUTME: Equipment reference data and the groups equipment is organised into
// ABOUTME: Defines entity records and the create/update payload for equipment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityMeta;
use crate::constants::text::{DESCRIPTION_MAX, NAME_MAX};
use crate::errors::FieldError;
use crate::validation::{FieldErrors, Validate};

/// A family of equipment (free weights, machines, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentGroup {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Unique display name
    pub name: String,
    /// Short description
    pub description: Option<String>,
}

/// A piece of equipment (barbell, cable stack, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Unique display name
    pub name: String,
    /// Short description
    pub description: Option<String>,
    /// Group this equipment belongs to
    pub equipment_group_id: Option<Uuid>,
}

/// Create/update payload for [`Equipment`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentInput {
    /// Unique display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// Group this equipment belongs to
    #[serde(default)]
    pub equipment_group_id: Option<Uuid>,
}

impl Validate for EquipmentInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .required_text("name", &self.name, NAME_MAX)
            .optional_text("description", self.description.as_deref(), DESCRIPTION_MAX)
            .optional_id("equipment_group_id", self.equipment_group_id)
            .finish()
    }
}
