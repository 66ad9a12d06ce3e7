//! # Validation Module
//!
//! Field rules for customers, checked before any database access.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer                                                │
//! │  └── Deserialization into NewCustomer / CustomerQuery                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Required fields, lengths, email shape                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints (company, customer type)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use patron_core::validation::{validate_email, validate_tax_id};
//!
//! assert!(validate_tax_id("AIN010101AAA").is_ok());
//! assert!(validate_email("contact@ACME.biz").is_ok());
//! assert!(validate_email("not-an-email").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{Customer, NewCustomer};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_FULL_NAME_LEN: usize = 128;
pub const MAX_TAX_ID_LEN: usize = 30;
pub const MAX_EMAIL_LEN: usize = 128;
pub const MAX_CONTACT_LEN: usize = 128;

// =============================================================================
// Field Validators
// =============================================================================

fn required_within(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    within(field, value, max)
}

fn within(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a customer display name: required, at most 64 characters.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    required_within("name", name, MAX_NAME_LEN)
}

/// Validates a full legal name: required, at most 128 characters.
pub fn validate_full_name(full_name: &str) -> ValidationResult<()> {
    required_within("full_name", full_name, MAX_FULL_NAME_LEN)
}

/// Validates a tax identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 30 characters
/// - No embedded whitespace
pub fn validate_tax_id(tax_id: &str) -> ValidationResult<()> {
    required_within("tax_id", tax_id, MAX_TAX_ID_LEN)?;

    if tax_id.trim().chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format(
            "tax_id",
            "must not contain spaces",
        ));
    }

    Ok(())
}

/// Validates an email address.
///
/// Only the shape is checked: one `@` with text on both sides and a dot in
/// the domain. Deliverability is not our concern.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    within("email", email, MAX_EMAIL_LEN)?;

    let malformed = || ValidationError::invalid_format("email", "expected local@domain");

    let (local, domain) = email.split_once('@').ok_or_else(malformed)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(malformed());
    }

    Ok(())
}

/// Validates a contact person name: optional, at most 128 characters.
pub fn validate_contact(contact: &str) -> ValidationResult<()> {
    within("contact", contact.trim(), MAX_CONTACT_LEN)
}

// =============================================================================
// Entity Validators
// =============================================================================

fn validate_fields(
    name: &str,
    full_name: &str,
    tax_id: &str,
    email: Option<&str>,
    contact: Option<&str>,
) -> ValidationResult<()> {
    validate_name(name)?;
    validate_full_name(full_name)?;
    validate_tax_id(tax_id)?;

    if let Some(email) = email {
        validate_email(email)?;
    }

    if let Some(contact) = contact {
        validate_contact(contact)?;
    }

    Ok(())
}

/// Validates every user-settable field of a customer about to be created.
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_fields(
        &customer.name,
        &customer.full_name,
        &customer.tax_id,
        customer.email.as_deref(),
        customer.contact.as_deref(),
    )
}

/// Validates a customer about to be updated.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_fields(
        &customer.name,
        &customer.full_name,
        &customer.tax_id,
        customer.email.as_deref(),
        customer.contact.as_deref(),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Acme").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(65)).is_err());
        assert!(validate_name(&"Á".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_tax_id() {
        assert!(validate_tax_id("AIN010101AAA").is_ok());
        assert!(validate_tax_id("").is_err());
        assert!(validate_tax_id("AIN 010101").is_err());
        assert!(validate_tax_id(&"X".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("contact@ACME.biz").is_ok());
        assert!(validate_email("a.b@mail.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("acme.biz").is_err());
        assert!(validate_email("@acme.biz").is_err());
        assert!(validate_email("contact@acme").is_err());
        assert!(validate_email("contact@acme.").is_err());
        assert!(validate_email("a@b@acme.biz").is_err());
        assert!(validate_email("con tact@acme.biz").is_err());
    }

    #[test]
    fn test_validate_new_customer_reports_first_bad_field() {
        let customer = NewCustomer {
            name: "Acme".to_string(),
            full_name: String::new(),
            tax_id: "AIN010101AAA".to_string(),
            email: Some("broken".to_string()),
            contact: None,
            company_id: 1,
            customer_type_id: 1,
        };

        let err = validate_new_customer(&customer).unwrap_err();
        assert_eq!(err, ValidationError::required("full_name"));
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let customer = NewCustomer {
            name: "Acme".to_string(),
            full_name: "Acme Industrial".to_string(),
            tax_id: "AIN010101AAA".to_string(),
            email: None,
            contact: None,
            company_id: 1,
            customer_type_id: 1,
        };

        assert!(validate_new_customer(&customer).is_ok());
    }
}
