//! Form field validation.
//!
//! Both text fields of a record are required and must reach a minimum
//! length. Errors are reported per field so they can be shown next to the
//! offending input.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::RecordDraft;

/// Default minimum length for both record fields.
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// An editable field of a record form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The record keyword.
    Keyword,
    /// The record description.
    Description,
}

impl Field {
    /// All form fields, in display order.
    pub const ALL: [Field; 2] = [Field::Keyword, Field::Description];

    /// Human-readable label used in prompts and table headers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::Description => "Description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword => write!(f, "keyword"),
            Self::Description => write!(f, "description"),
        }
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldError {
    /// The field is empty.
    Required,
    /// The field is shorter than the configured minimum.
    TooShort {
        /// Minimum number of characters.
        min: usize,
    },
}

impl FieldError {
    /// The inline message shown for this error on `field`.
    #[must_use]
    pub fn message(self, field: Field) -> String {
        match self {
            Self::Required => format!("Please enter a {field}"),
            Self::TooShort { min } => format!("Please enter at least {min} characters"),
        }
    }
}

/// Field errors collected from one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<(Field, FieldError)>,
}

impl ValidationErrors {
    /// Record an error for `field`.
    pub fn push(&mut self, field: Field, error: FieldError) {
        self.errors.push((field, error));
    }

    /// The error reported for `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, e)| *e)
    }

    /// Iterate over `(field, error)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().copied()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {}", error.message(*field))?;
        }
        Ok(())
    }
}

/// Minimum-length rules for the record form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    /// Minimum keyword length in characters.
    pub min_keyword_length: usize,
    /// Minimum description length in characters.
    pub min_description_length: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            min_keyword_length: DEFAULT_MIN_LENGTH,
            min_description_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl Rules {
    /// Minimum length configured for `field`.
    #[must_use]
    pub fn min_length(&self, field: Field) -> usize {
        match field {
            Field::Keyword => self.min_keyword_length,
            Field::Description => self.min_description_length,
        }
    }

    /// Check a single field value.
    #[must_use]
    pub fn check_field(&self, field: Field, value: &str) -> Option<FieldError> {
        if value.is_empty() {
            return Some(FieldError::Required);
        }
        let min = self.min_length(field);
        if value.chars().count() < min {
            return Some(FieldError::TooShort { min });
        }
        None
    }

    /// Check both fields of a draft.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any field is invalid.
    pub fn check(&self, draft: &RecordDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for field in Field::ALL {
            if let Some(error) = self.check_field(field, draft.value(field)) {
                errors.push(field, error);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
