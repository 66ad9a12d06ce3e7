//! # Company Repository
//!
//! Companies own customers. The registry only needs to store them and to
//! resolve a company id before a customer is written.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use patron_core::{Company, NewCompany};

/// Repository for company database operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyRepository;

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new() -> Self {
        CompanyRepository
    }

    /// Inserts a company and returns it with its assigned id.
    pub async fn insert(&self, conn: &mut SqliteConnection, company: &NewCompany) -> DbResult<Company> {
        debug!(name = %company.name, "Inserting company");

        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, full_name)
            VALUES (?1, ?2)
            RETURNING id, name, full_name
            "#,
        )
        .bind(&company.name)
        .bind(&company.full_name)
        .fetch_one(&mut *conn)
        .await?;

        Ok(company)
    }

    /// Gets a company by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Company))` - Company found
    /// * `Ok(None)` - No company with that id
    pub async fn get(&self, conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, full_name FROM companies WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_insert_then_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut tx = db.begin().await.unwrap();
        let repo = db.companies();

        let company = repo
            .insert(
                &mut tx,
                &NewCompany {
                    name: "UM".to_string(),
                    full_name: "Universidad de Montemorelos".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(company.id > 0);
        assert_eq!(repo.get(&mut tx, company.id).await.unwrap(), Some(company));
        assert_eq!(repo.get(&mut tx, 9999).await.unwrap(), None);
    }
}
