//! Declarative, per-entity validation.
//!
//! Each submittable entity implements [`Validate`] by listing its field rules
//! on a [`Schema`]. All failing fields are reported together; once a field has
//! failed, later rules for the same field are skipped so every field yields at
//! most one error.

use serde::Serialize;

use crate::value_object::{ValueError, ValueObject};

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Gateway (camelCase) name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl core::fmt::Display for FieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Non-empty list of field errors for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &'static str, error: ValueError) -> Self {
        Self(vec![FieldError {
            field,
            message: error.to_string(),
        }])
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            core::fmt::Display::fmt(err, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Entities that must pass a schema before being sent to the gateway.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Rule collector used by [`Validate`] implementations.
#[derive(Debug, Default)]
#[must_use = "call `finish` to obtain the validation result"]
pub struct Schema {
    errors: Vec<FieldError>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    fn failed(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn push(&mut self, field: &'static str, error: ValueError) {
        if !self.failed(field) {
            self.errors.push(FieldError {
                field,
                message: error.to_string(),
            });
        }
    }

    /// Record the outcome of an arbitrary rule.
    pub fn check<T>(mut self, field: &'static str, outcome: Result<T, ValueError>) -> Self {
        if let Err(e) = outcome {
            self.push(field, e);
        }
        self
    }

    /// The value must contain something other than whitespace.
    pub fn required(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.push(field, ValueError::Required);
        }
        self
    }

    /// An optional value must be present.
    pub fn present<T>(mut self, field: &'static str, value: Option<&T>) -> Self {
        if value.is_none() {
            self.push(field, ValueError::Required);
        }
        self
    }

    pub fn max_len(mut self, field: &'static str, value: &str, max: usize) -> Self {
        if value.trim().chars().count() > max {
            self.push(field, ValueError::TooLong(max));
        }
        self
    }

    /// The value must parse as the given value object.
    pub fn parses<V: ValueObject>(self, field: &'static str, value: &str) -> Self {
        self.check(field, V::parse(value))
    }

    /// The value must be one of `allowed` (exact match).
    pub fn one_of(mut self, field: &'static str, value: &str, allowed: &[&str]) -> Self {
        if value.trim().is_empty() {
            self.push(field, ValueError::Required);
        } else if !allowed.contains(&value) {
            self.push(field, ValueError::NotAllowed);
        }
        self
    }

    /// Identifiers handed out upstream start at 1.
    pub fn positive_id(mut self, field: &'static str, id: i64) -> Self {
        if id < 1 {
            self.push(field, ValueError::Identifier);
        }
        self
    }

    pub fn non_negative(mut self, field: &'static str, value: i64) -> Self {
        if value < 0 {
            self.push(field, ValueError::Negative);
        }
        self
    }

    pub fn matches(mut self, field: &'static str, value: &str, other: &str) -> Self {
        if value != other {
            self.push(field, ValueError::Mismatch);
        }
        self
    }

    /// Fold nested errors (e.g. one per list element) into this schema.
    pub fn nested(mut self, result: Result<(), ValidationErrors>) -> Self {
        if let Err(nested) = result {
            for err in nested.0 {
                if !self.failed(err.field) {
                    self.errors.push(err);
                }
            }
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}
