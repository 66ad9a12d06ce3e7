//! # Domain Types
//!
//! Entities of the customer registry.
//!
//! ## Type Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    Company      │ 1    * │    Customer     │ *    1 ┌─────────────┐ │
//! │  │  ─────────────  │◄───────│  ─────────────  │───────►│CustomerType │ │
//! │  │  id             │        │  id             │        │ ─────────── │ │
//! │  │  name           │        │  name           │        │ id          │ │
//! │  │  full_name      │        │  full_name      │        │ name        │ │
//! │  └────────▲────────┘        │  tax_id         │        └─────────────┘ │
//! │           │                 │  email          │                        │
//! │           │ company_id      │  contact        │                        │
//! │  ┌────────┴────────┐        └─────────────────┘                        │
//! │  │      User       │  acting principal, never persisted here           │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries a surrogate numeric id assigned by the database.
//! Input types (`NewCustomer`, `NewCompany`, `NewCustomerType`) carry no id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Company
// =============================================================================

/// Organization owning a set of customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Company {
    pub id: i64,
    /// Short display name.
    pub name: String,
    /// Full legal name.
    pub full_name: String,
}

/// A company that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub full_name: String,
}

// =============================================================================
// Customer Type
// =============================================================================

/// Classification of customers (e.g. "Retail", "Wholesale").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A customer type that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomerType {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// User
// =============================================================================

/// The acting principal of a write.
///
/// Only `company_id` matters to the registry: when a user is supplied to
/// create or update, the customer is placed under the user's company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub company_id: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    /// Surrogate id assigned on insert.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Full legal name.
    pub full_name: String,

    /// Tax identifier.
    pub tax_id: String,

    pub email: Option<String>,

    /// Contact person.
    pub contact: Option<String>,

    /// Owning company.
    pub company_id: i64,

    /// Classification.
    pub customer_type_id: i64,

    /// Set by the database on insert.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// The user-settable fields of a customer, used to create one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub full_name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub contact: Option<String>,
    /// Replaced by the acting user's company when a user is supplied.
    pub company_id: i64,
    pub customer_type_id: i64,
}

impl From<&Customer> for NewCustomer {
    fn from(customer: &Customer) -> Self {
        NewCustomer {
            name: customer.name.clone(),
            full_name: customer.full_name.clone(),
            tax_id: customer.tax_id.clone(),
            email: customer.email.clone(),
            contact: customer.contact.clone(),
            company_id: customer.company_id,
            customer_type_id: customer.customer_type_id,
        }
    }
}

impl NewCustomer {
    /// Places the customer under the acting user's company.
    ///
    /// A user can only write customers for their own organization, so any
    /// company on the incoming payload is discarded.
    pub fn assign_tenant(&mut self, user: Option<&User>) {
        if let Some(user) = user {
            self.company_id = user.company_id;
        }
    }

    /// Trims every text field; a blank email or contact becomes `None`.
    ///
    /// Run before validation so the stored value is the validated one.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.full_name);
        trim_in_place(&mut self.tax_id);
        trim_optional(&mut self.email);
        trim_optional(&mut self.contact);
    }

    /// Lowercased text the listing filter is matched against.
    pub fn search_text(&self) -> String {
        search_text(
            &self.name,
            &self.full_name,
            &self.tax_id,
            self.email.as_deref(),
            self.contact.as_deref(),
        )
    }
}

impl Customer {
    /// Same rule as [`NewCustomer::assign_tenant`], for updates.
    pub fn assign_tenant(&mut self, user: Option<&User>) {
        if let Some(user) = user {
            self.company_id = user.company_id;
        }
    }

    /// See [`NewCustomer::normalize`].
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.full_name);
        trim_in_place(&mut self.tax_id);
        trim_optional(&mut self.email);
        trim_optional(&mut self.contact);
    }

    pub fn search_text(&self) -> String {
        search_text(
            &self.name,
            &self.full_name,
            &self.tax_id,
            self.email.as_deref(),
            self.contact.as_deref(),
        )
    }
}

/// Separates the fields inside a search text so a match cannot span two of
/// them.
pub const SEARCH_TEXT_SEPARATOR: char = '\u{1f}';

/// Joins the searchable fields and lowercases them with full Unicode case
/// folding (`"JOSÉ"` becomes `"josé"`), which SQLite's `lower()` and `LIKE`
/// only do for ASCII.
fn search_text(
    name: &str,
    full_name: &str,
    tax_id: &str,
    email: Option<&str>,
    contact: Option<&str>,
) -> String {
    let fields = [
        name,
        full_name,
        tax_id,
        email.unwrap_or_default(),
        contact.unwrap_or_default(),
    ];

    let mut text = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            text.push(SEARCH_TEXT_SEPARATOR);
        }
        text.push_str(&field.to_lowercase());
    }
    text
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn trim_optional(value: &mut Option<String>) {
    if let Some(inner) = value {
        trim_in_place(inner);
        if inner.is_empty() {
            *value = None;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_customer() -> NewCustomer {
        NewCustomer {
            name: "Acme".to_string(),
            full_name: "Acme Industrial S.A. de C.V.".to_string(),
            tax_id: "AIN010101AAA".to_string(),
            email: Some("contact@ACME.biz".to_string()),
            contact: Some("Laura Ortiz".to_string()),
            company_id: 7,
            customer_type_id: 1,
        }
    }

    #[test]
    fn test_assign_tenant_overrides_company() {
        let mut customer = sample_new_customer();
        let user = User {
            id: 1,
            username: "admin".to_string(),
            company_id: 42,
        };

        customer.assign_tenant(Some(&user));
        assert_eq!(customer.company_id, 42);
    }

    #[test]
    fn test_assign_tenant_without_user_keeps_company() {
        let mut customer = sample_new_customer();
        customer.assign_tenant(None);
        assert_eq!(customer.company_id, 7);
    }

    #[test]
    fn test_new_customer_from_customer() {
        let input = sample_new_customer();
        let stored = Customer {
            id: 3,
            name: input.name.clone(),
            full_name: input.full_name.clone(),
            tax_id: input.tax_id.clone(),
            email: input.email.clone(),
            contact: input.contact.clone(),
            company_id: input.company_id,
            customer_type_id: input.customer_type_id,
            created_at: Utc::now(),
        };

        assert_eq!(NewCustomer::from(&stored), input);
    }

    #[test]
    fn test_normalize_trims_fields() {
        let mut customer = NewCustomer {
            name: "  Acme  ".to_string(),
            full_name: "\tAcme Industrial\n".to_string(),
            tax_id: " AIN010101AAA\t".to_string(),
            email: Some("   ".to_string()),
            contact: Some(" Laura Ortiz ".to_string()),
            ..sample_new_customer()
        };

        customer.normalize();

        assert_eq!(customer.name, "Acme");
        assert_eq!(customer.full_name, "Acme Industrial");
        assert_eq!(customer.tax_id, "AIN010101AAA");
        assert_eq!(customer.email, None);
        assert_eq!(customer.contact.as_deref(), Some("Laura Ortiz"));
    }

    #[test]
    fn test_search_text_folds_unicode_case() {
        let customer = NewCustomer {
            name: "FERRETERÍA PEÑA".to_string(),
            tax_id: "PEÑA010101AAA".to_string(),
            email: None,
            contact: Some("JOSÉ ÁLVAREZ".to_string()),
            ..sample_new_customer()
        };

        let text = customer.search_text();

        assert!(text.contains("ferretería peña"));
        assert!(text.contains("peña010101aaa"));
        assert!(text.contains("josé álvarez"));
        assert!(!text.contains("peñaacme"));
        assert_eq!(text.split(SEARCH_TEXT_SEPARATOR).count(), 5);
    }
}
