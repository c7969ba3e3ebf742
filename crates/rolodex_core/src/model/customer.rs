//! Customer domain model.
//!
//! # Responsibility
//! - Define the record listed, filtered and edited by the directory.
//! - Own the validation rules applied before every write.
//!
//! # Invariants
//! - `id` is stable and never reused for another customer.
//! - Names are stored exactly as entered; an unknown name is `""`, never unset.
//! - `last_name` is the filter key for prefix listing.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a customer.
pub type CustomerId = Uuid;

/// Upper bound for a single name field, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Which name field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    FirstName,
    LastName,
}

impl Display for NameField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstName => f.write_str("first_name"),
            Self::LastName => f.write_str("last_name"),
        }
    }
}

/// Validation failure for customer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerValidationError {
    /// Name contains a control character such as a newline or NUL.
    ControlCharacter { field: NameField },
    /// Name is longer than [`MAX_NAME_CHARS`].
    TooLong { field: NameField, chars: usize },
}

impl Display for CustomerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ControlCharacter { field } => {
                write!(f, "{field} must not contain control characters")
            }
            Self::TooLong { field, chars } => write!(
                f,
                "{field} is {chars} characters long; maximum is {MAX_NAME_CHARS}"
            ),
        }
    }
}

impl Error for CustomerValidationError {}

/// A persisted customer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
}

impl Customer {
    /// Creates a customer with a freshly generated id.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), first_name, last_name)
    }

    /// Creates a customer with a caller-provided id.
    ///
    /// Used by import paths and by stores decoding persisted rows.
    pub fn with_id(
        id: CustomerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns `"first last"` without dangling whitespace when a part is empty.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Returns the case-folded filter key.
    pub fn folded_last_name(&self) -> String {
        fold_case(&self.last_name)
    }

    /// Checks name fields against write rules.
    pub fn validate(&self) -> Result<(), CustomerValidationError> {
        validate_name(NameField::FirstName, &self.first_name)?;
        validate_name(NameField::LastName, &self.last_name)?;
        Ok(())
    }
}

/// Case folding shared by every store and the listing resolver.
///
/// Unicode lowercase, so `"ÅSA"` and `"åsa"` compare equal.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

fn validate_name(field: NameField, value: &str) -> Result<(), CustomerValidationError> {
    if value.chars().any(char::is_control) {
        return Err(CustomerValidationError::ControlCharacter { field });
    }
    let chars = value.chars().count();
    if chars > MAX_NAME_CHARS {
        return Err(CustomerValidationError::TooLong { field, chars });
    }
    Ok(())
}
