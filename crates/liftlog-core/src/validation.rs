// ABOUTME: Field-level validation rules applied to incoming requests
// ABOUTME: Defines the Validate trait and a small collector for common checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::FieldError;

/// Types that can check their own field-level invariants
///
/// The default implementation accepts everything, which is what requests
/// made only of typed identifiers want.
pub trait Validate {
    /// Return every rule the value breaks; empty means valid
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Validate for Uuid {}
impl Validate for () {}

/// Accumulates field errors while a value is checked
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    /// Start an empty collector
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record an error unconditionally
    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Required text: not blank and at most `max` characters
    pub fn required_text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.add(field, "must not be empty");
        } else {
            self.max_chars(field, value, max);
        }
        self
    }

    /// Optional text of at most `max` characters
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_chars(field, value, max);
        }
        self
    }

    fn max_chars(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("must be at most {max} characters"));
        }
    }

    /// Identifier that must not be the nil UUID
    pub fn required_id(&mut self, field: &str, value: Uuid) -> &mut Self {
        if value.is_nil() {
            self.add(field, "must be a non-nil identifier");
        }
        self
    }

    /// Optional identifier that must not be the nil UUID when present
    pub fn optional_id(&mut self, field: &str, value: Option<Uuid>) -> &mut Self {
        if let Some(value) = value {
            self.required_id(field, value);
        }
        self
    }

    /// Integer within an inclusive range
    pub fn int_range(&mut self, field: &str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min || value > max {
            self.add(field, format!("must be between {min} and {max}"));
        }
        self
    }

    /// Optional integer within an inclusive range
    pub fn optional_int_range(
        &mut self,
        field: &str,
        value: Option<i64>,
        min: i64,
        max: i64,
    ) -> &mut Self {
        if let Some(value) = value {
            self.int_range(field, value, min, max);
        }
        self
    }

    /// Finite, non-negative quantity (weights, increments)
    pub fn non_negative(&mut self, field: &str, value: f64) -> &mut Self {
        if !value.is_finite() {
            self.add(field, "must be a finite number");
        } else if value < 0.0 {
            self.add(field, "must not be negative");
        }
        self
    }

    /// Optional finite, non-negative quantity
    pub fn optional_non_negative(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if let Some(value) = value {
            self.non_negative(field, value);
        }
        self
    }

    /// `end` must not precede `start`
    pub fn not_before(
        &mut self,
        field: &str,
        end: Option<DateTime<Utc>>,
        start: DateTime<Utc>,
        start_field: &str,
    ) -> &mut Self {
        if end.is_some_and(|end| end < start) {
            self.add(field, format!("must not be earlier than {start_field}"));
        }
        self
    }

    /// Finish and hand back the collected errors
    #[must_use]
    pub fn finish(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_required_text_rejects_blank_and_long() {
        let errors = FieldErrors::new()
            .required_text("name", "   ", 10)
            .required_text("title", "abcdefghijk", 10)
            .required_text("ok", "fine", 10)
            .finish();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].message, "must be at most 10 characters");
    }

    #[test]
    fn test_numeric_rules() {
        let errors = FieldErrors::new()
            .int_range("sets", 0, 1, 100)
            .non_negative("weight", -2.5)
            .non_negative("increment", f64::NAN)
            .optional_int_range("rpe", None, 1, 10)
            .finish();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["sets", "weight", "increment"]);
    }

    #[test]
    fn test_not_before() {
        let start = Utc::now();
        let errors = FieldErrors::new()
            .not_before("completed_at", Some(start - Duration::minutes(1)), start, "started_at")
            .not_before("other", Some(start), start, "started_at")
            .finish();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "completed_at");
    }

    #[test]
    fn test_nil_identifier_rejected() {
        let errors = FieldErrors::new()
            .required_id("exercise_type_id", Uuid::nil())
            .optional_id("equipment_id", None)
            .finish();
        assert_eq!(errors.len(), 1);
    }
}
