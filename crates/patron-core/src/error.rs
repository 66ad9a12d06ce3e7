//! # Error Types
//!
//! Validation errors raised by patron-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  patron-core errors (this file)                                        │
//! │  └── ValidationError  - Bad field values or list parameters            │
//! │                                                                         │
//! │  patron-db errors (separate crate)                                     │
//! │  └── DbError          - NotFound, ReferentialIntegrity, persistence    │
//! │                          failures; wraps ValidationError               │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → caller (rolls back, shows message)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any query runs, so a validation failure never leaves a
/// partial write behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field or parameter is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. malformed email, non-numeric page).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set (e.g. unknown sort field).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field or parameter.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("order");
        assert_eq!(err.to_string(), "order is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 64,
        };
        assert_eq!(err.to_string(), "name must be at most 64 characters");

        let err = ValidationError::invalid_format("max", "expected a whole number");
        assert_eq!(err.to_string(), "max has invalid format: expected a whole number");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::NotAllowed {
            field: "order".to_string(),
            allowed: vec!["name".to_string()],
        };
        assert_eq!(err.field(), "order");
    }
}
