//! # Customer Repository
//!
//! Search, retrieval, creation, update and deletion of customers.
//!
//! ## Sessions
//! Every operation takes the connection it runs on. Callers open one
//! transaction per incoming request, pass it to as many repository calls as
//! they need, then commit or roll back:
//!
//! ```rust,ignore
//! let mut tx = db.begin().await?;
//! let created = db.customers().create(&mut tx, new_customer, Some(&user)).await?;
//! tx.commit().await?;
//! ```
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Listing Is Built                               │
//! │                                                                         │
//! │  CustomerQuery                                                         │
//! │       │                                                                 │
//! │       ├──► page query:  SELECT cols ... WHERE <filters>                │
//! │       │                 ORDER BY <allow-listed column>                 │
//! │       │                 LIMIT max OFFSET offset   (unless report)      │
//! │       │                                                                 │
//! │       └──► count query: SELECT COUNT(*) ... WHERE <same filters>       │
//! │                                                                         │
//! │  <filters>:  company_id = ?                                            │
//! │              customer_type_id = ?                                      │
//! │              search_text LIKE ?   (lowercased name, full name,         │
//! │                                    tax id, email, contact)             │
//! │                                                                         │
//! │  Result: CustomerList { customers, count, max, offset }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Writes
//! Create and update place the customer under the acting user's company
//! (when a user is given), trim and validate fields, then resolve the
//! referenced customer type and company. Only after every check passes is
//! the single INSERT / UPDATE issued, so a failed write leaves nothing
//! behind.
//!
//! ## Case-Insensitive Search
//! SQLite folds case for ASCII only, so `"JOSÉ"` would never match `josé`.
//! Every write stores `search_text`, the searchable fields lowercased in
//! Rust; the filter is lowercased the same way and matched against it.

use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::company::CompanyRepository;
use crate::repository::customer_type::CustomerTypeRepository;
use patron_core::validation::{validate_customer, validate_new_customer};
use patron_core::{Customer, CustomerQuery, NewCustomer, User};

const SELECT_CUSTOMERS: &str = "SELECT id, name, full_name, tax_id, email, contact, \
     company_id, customer_type_id, created_at FROM customers WHERE 1 = 1";

const COUNT_CUSTOMERS: &str = "SELECT COUNT(*) FROM customers WHERE 1 = 1";

/// One page of customers plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
    /// Rows matching the filters, ignoring paging.
    pub count: i64,
    /// Effective page size.
    pub max: u32,
    /// Effective row offset.
    pub offset: u64,
}

/// Repository for customer database operations.
///
/// Stateless; share or copy it freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerRepository {
    companies: CompanyRepository,
    customer_types: CustomerTypeRepository,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new() -> Self {
        CustomerRepository {
            companies: CompanyRepository::new(),
            customer_types: CustomerTypeRepository::new(),
        }
    }

    /// Lists customers matching `query`, one page at a time.
    ///
    /// Runs two read-only queries: the page itself and an independent count
    /// with the same filters. Without a sort field, rows come back in id
    /// order so that pages are stable.
    pub async fn list(
        &self,
        conn: &mut SqliteConnection,
        query: &CustomerQuery,
    ) -> DbResult<CustomerList> {
        debug!(?query, "Listing customers");

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_CUSTOMERS);
        push_filters(&mut builder, query);

        builder.push(" ORDER BY ");
        match query.sort {
            Some(sort) => {
                builder
                    .push(sort.field.column())
                    .push(" ")
                    .push(sort.direction.keyword())
                    .push(", id ASC");
            }
            None => {
                builder.push("id ASC");
            }
        }

        if let Some(window) = query.pagination() {
            builder
                .push(" LIMIT ")
                .push_bind(i64::from(window.limit))
                .push(" OFFSET ")
                .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
        }

        let customers = builder
            .build_query_as::<Customer>()
            .fetch_all(&mut *conn)
            .await?;

        let count = self.count(conn, query).await?;

        debug!(returned = customers.len(), count, "Listing complete");

        Ok(CustomerList {
            customers,
            count,
            max: query.page_size(),
            offset: query.effective_offset(),
        })
    }

    /// Counts customers matching the filters of `query`.
    ///
    /// Paging, sorting and the report flag are ignored.
    pub async fn count(&self, conn: &mut SqliteConnection, query: &CustomerQuery) -> DbResult<i64> {
        let mut builder = QueryBuilder::<Sqlite>::new(COUNT_CUSTOMERS);
        push_filters(&mut builder, query);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    /// Gets a customer by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - No customer with that id
    pub async fn get(&self, conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Customer>> {
        debug!(id, "Getting customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, full_name, tax_id, email, contact,
                   company_id, customer_type_id, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(customer)
    }

    /// Like [`get`](Self::get), but a missing row is `DbError::NotFound`.
    pub async fn get_required(&self, conn: &mut SqliteConnection, id: i64) -> DbResult<Customer> {
        self.get(conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Creates a customer.
    ///
    /// ## Arguments
    /// * `customer` - Fields of the new customer
    /// * `user` - Acting user; when given, the customer is placed under the
    ///   user's company regardless of `customer.company_id`
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Stored customer with id and `created_at` assigned
    /// * `Err(DbError::Validation)` - Bad field value
    /// * `Err(DbError::ReferentialIntegrity)` - Unknown customer type or company
    pub async fn create(
        &self,
        conn: &mut SqliteConnection,
        mut customer: NewCustomer,
        user: Option<&User>,
    ) -> DbResult<Customer> {
        customer.assign_tenant(user);
        customer.normalize();
        validate_new_customer(&customer)?;

        debug!(
            name = %customer.name,
            company_id = customer.company_id,
            customer_type_id = customer.customer_type_id,
            "Creating customer"
        );

        self.resolve_references(conn, customer.company_id, customer.customer_type_id)
            .await?;

        let created = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                name, full_name, tax_id, email, contact,
                company_id, customer_type_id, search_text
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8
            )
            RETURNING id, name, full_name, tax_id, email, contact,
                      company_id, customer_type_id, created_at
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.full_name)
        .bind(&customer.tax_id)
        .bind(&customer.email)
        .bind(&customer.contact)
        .bind(customer.company_id)
        .bind(customer.customer_type_id)
        .bind(customer.search_text())
        .fetch_one(&mut *conn)
        .await?;

        debug!(id = created.id, "Customer created");
        Ok(created)
    }

    /// Replaces every mutable field of the customer identified by
    /// `customer.id`.
    ///
    /// Same tenant, validation and reference rules as [`create`](Self::create).
    /// `created_at` on the argument is ignored.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - The stored row after the update
    /// * `Err(DbError::NotFound)` - No customer with that id
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        mut customer: Customer,
        user: Option<&User>,
    ) -> DbResult<Customer> {
        customer.assign_tenant(user);
        customer.normalize();
        validate_customer(&customer)?;

        debug!(
            id = customer.id,
            company_id = customer.company_id,
            customer_type_id = customer.customer_type_id,
            "Updating customer"
        );

        self.resolve_references(conn, customer.company_id, customer.customer_type_id)
            .await?;

        let updated = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name = ?2,
                full_name = ?3,
                tax_id = ?4,
                email = ?5,
                contact = ?6,
                company_id = ?7,
                customer_type_id = ?8,
                search_text = ?9
            WHERE id = ?1
            RETURNING id, name, full_name, tax_id, email, contact,
                      company_id, customer_type_id, created_at
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.full_name)
        .bind(&customer.tax_id)
        .bind(&customer.email)
        .bind(&customer.contact)
        .bind(customer.company_id)
        .bind(customer.customer_type_id)
        .bind(customer.search_text())
        .fetch_optional(&mut *conn)
        .await?;

        updated.ok_or_else(|| DbError::not_found("Customer", customer.id))
    }

    /// Deletes a customer and returns its display name.
    ///
    /// Hard delete: the row is gone once the caller commits.
    ///
    /// ## Returns
    /// * `Ok(String)` - Name of the removed customer
    /// * `Err(DbError::NotFound)` - No customer with that id (nothing removed)
    pub async fn delete(&self, conn: &mut SqliteConnection, id: i64) -> DbResult<String> {
        debug!(id, "Deleting customer");

        let name = sqlx::query_scalar::<_, String>(
            "DELETE FROM customers WHERE id = ?1 RETURNING name",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        name.ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Looks up the customer type and company a write refers to.
    ///
    /// Caller-supplied ids are never trusted as-is: each must resolve to a
    /// stored row before the customer is written.
    async fn resolve_references(
        &self,
        conn: &mut SqliteConnection,
        company_id: i64,
        customer_type_id: i64,
    ) -> DbResult<()> {
        if self.customer_types.get(conn, customer_type_id).await?.is_none() {
            return Err(DbError::missing_reference("CustomerType", customer_type_id));
        }

        if self.companies.get(conn, company_id).await?.is_none() {
            return Err(DbError::missing_reference("Company", company_id));
        }

        Ok(())
    }
}

/// Appends the WHERE constraints shared by the page and count queries.
fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &CustomerQuery) {
    if let Some(company_id) = query.company {
        builder.push(" AND company_id = ").push_bind(company_id);
    }

    if let Some(customer_type_id) = query.customer_type {
        builder
            .push(" AND customer_type_id = ")
            .push_bind(customer_type_id);
    }

    // both sides are already lowercased
    if let Some(pattern) = query.filter_pattern() {
        builder
            .push(" AND search_text LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\'");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
