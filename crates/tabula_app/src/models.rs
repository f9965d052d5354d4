//! The demo data model.

use serde::{Deserialize, Serialize};

use tabula_record::{Record, ValidationError, text};

/// Maximum length of [`NamedRecord::name`], enforced by the store on save.
pub const NAME_MAX_LENGTH: usize = 100;

/// A record with a single bounded text field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedRecord {
    /// Free-form name, at most [`NAME_MAX_LENGTH`] characters.
    pub name: String,
}

impl NamedRecord {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Record for NamedRecord {
    fn type_name() -> &'static str {
        "NamedRecord"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        text::max_length("name", &self.name, NAME_MAX_LENGTH)
    }
}
