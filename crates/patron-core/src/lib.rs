//! # patron-core: Customer Domain for Patron
//!
//! Pure domain types and rules for the customer registry. Nothing in this
//! crate touches a database or the network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Patron Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Request-handling layer (not in this repo)           │   │
//! │  │     list / show / create / update / delete customer             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ patron-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────────┐  ┌────────────┐             │   │
//! │  │   │   types   │  │     query     │  │ validation │             │   │
//! │  │   │ Customer  │  │ CustomerQuery │  │   rules    │             │   │
//! │  │   │ Company   │  │ SortField     │  │   checks   │             │   │
//! │  │   └───────────┘  └───────────────┘  └────────────┘             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   patron-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Customer, Company, CustomerType, User)
//! - [`query`] - Typed list parameters: paging, filters, sort allow-list
//! - [`validation`] - Field rules applied before any write
//! - [`error`] - Validation error type
//!
//! ## Example Usage
//!
//! ```rust
//! use patron_core::query::{CustomerQuery, SortDirection, SortField};
//!
//! let query = CustomerQuery::new()
//!     .max(500)
//!     .page(3)
//!     .filter("acme")
//!     .order_by(SortField::Name, SortDirection::Desc);
//!
//! // Page size is clamped, the offset follows from the page
//! assert_eq!(query.page_size(), 100);
//! assert_eq!(query.effective_offset(), 200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use query::{CustomerQuery, Pagination, Sort, SortDirection, SortField};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when a list request does not name one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on a single page of customers.
///
/// ## Business Reason
/// Keeps interactive listings cheap. Full exports use the report flag,
/// which lifts paging altogether.
pub const MAX_PAGE_SIZE: u32 = 100;
