//! Field validation primitives.
//!
//! The store enforces record invariants on the way in: [`Record::validate`]
//! runs before every write, and a failure aborts the write before anything
//! is stored or any signal fires.
//!
//! [`Record::validate`]: crate::Record::validate

use thiserror::Error;

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation error on '{field}': {message}")]
pub struct ValidationError {
    /// The name of the offending field.
    pub field: String,
    /// What went wrong.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for a named field.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validators for text fields.
pub mod text {
    use super::ValidationError;

    /// Enforce a maximum length (in characters) on a text field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the field if `value` is longer
    /// than `max` characters.
    pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
        let len = value.chars().count();
        if len > max {
            return Err(ValidationError::new(
                field,
                format!("length {len} exceeds maximum {max}"),
            ));
        }
        Ok(())
    }
}
