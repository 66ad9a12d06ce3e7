//! # Repository Module
//!
//! Database repositories for the customer registry.
//!
//! ## Calling Convention
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories and Sessions                            │
//! │                                                                         │
//! │  Request handler                                                       │
//! │       │                                                                 │
//! │       │  let mut tx = db.begin().await?;                               │
//! │       │  db.customers().list(&mut tx, &query).await?                   │
//! │       │  tx.commit().await?;                                           │
//! │       ▼                                                                 │
//! │  CustomerRepository                                                    │
//! │  ├── list(&self, conn, query)                                          │
//! │  ├── get(&self, conn, id)                                              │
//! │  ├── create(&self, conn, customer, user)                               │
//! │  ├── update(&self, conn, customer, user)                               │
//! │  └── delete(&self, conn, id)                                           │
//! │       │                                                                 │
//! │       │  SQL on the caller's connection                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Repositories hold no connection of their own. The caller decides      │
//! │  where a unit of work begins and whether it commits.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer search and CRUD
//! - [`CompanyRepository`](company::CompanyRepository) - Company storage and lookup
//! - [`CustomerTypeRepository`](customer_type::CustomerTypeRepository) - Customer type lookup table

pub mod company;
pub mod customer;
pub mod customer_type;
