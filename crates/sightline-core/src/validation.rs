//! Validation utilities.

use crate::{FieldError, SightlineError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `SightlineError` on failure.
    fn validate_request(&self) -> Result<(), SightlineError> {
        self.validate().map_err(validation_errors_to_sightline_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `SightlineError`.
#[must_use]
pub fn validation_errors_to_sightline_error(errors: ValidationErrors) -> SightlineError {
    let field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();

    let message = field_errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    SightlineError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Longest key accepted by the pass-through cache API.
    pub const MAX_CACHE_KEY_LEN: usize = 512;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates a key for the pass-through cache API.
    pub fn valid_cache_key(key: &str) -> Result<(), ValidationError> {
        not_blank(key)?;
        if key.len() > MAX_CACHE_KEY_LEN {
            return Err(ValidationError::new("cache_key_too_long"));
        }
        if key.chars().any(char::is_control) {
            return Err(ValidationError::new("cache_key_invalid_characters"));
        }
        Ok(())
    }
}
