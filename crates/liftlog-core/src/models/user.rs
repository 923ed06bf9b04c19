// ABOUTME: User records provisioned from identity provider claims
// ABOUTME: Profile preferences such as display name and preferred weight unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use serde::{Deserialize, Serialize};

use super::EntityMeta;
use crate::constants::text::NAME_MAX;
use crate::errors::FieldError;
use crate::validation::{FieldErrors, Validate};

/// Unit the user prefers weights to be shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms
    #[default]
    Kg,
    /// Pounds
    Lb,
}

impl WeightUnit {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "lb" => Self::Lb,
            _ => Self::Kg,
        }
    }
}

/// A tenant of the service, keyed by the identity provider's subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity, timestamps and concurrency stamp
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// `sub` claim from the identity provider
    pub subject: String,
    /// Email claim, if the provider sent one
    pub email: Option<String>,
    /// Name shown in clients
    pub display_name: Option<String>,
    /// Preferred weight unit
    pub preferred_weight_unit: WeightUnit,
}

/// Profile update sent by the user themself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    /// Name shown in clients; blank clears it
    #[serde(default)]
    pub display_name: Option<String>,
    /// Preferred weight unit
    #[serde(default)]
    pub preferred_weight_unit: WeightUnit,
}

impl Validate for UpdateProfileInput {
    fn validate(&self) -> Vec<FieldError> {
        FieldErrors::new()
            .optional_text("display_name", self.display_name.as_deref(), NAME_MAX)
            .finish()
    }
}
