//! # Customer Type Repository
//!
//! Lookup table classifying customers. Customer writes resolve the
//! referenced type through [`CustomerTypeRepository::get`].

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use patron_core::{CustomerType, NewCustomerType};

/// Repository for customer type database operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerTypeRepository;

impl CustomerTypeRepository {
    /// Creates a new CustomerTypeRepository.
    pub fn new() -> Self {
        CustomerTypeRepository
    }

    /// Inserts a customer type.
    ///
    /// ## Returns
    /// * `Ok(CustomerType)` - Stored type with its id
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        customer_type: &NewCustomerType,
    ) -> DbResult<CustomerType> {
        debug!(name = %customer_type.name, "Inserting customer type");

        let customer_type = sqlx::query_as::<_, CustomerType>(
            r#"
            INSERT INTO customer_types (name, description)
            VALUES (?1, ?2)
            RETURNING id, name, description
            "#,
        )
        .bind(&customer_type.name)
        .bind(&customer_type.description)
        .fetch_one(&mut *conn)
        .await?;

        Ok(customer_type)
    }

    /// Gets a customer type by id.
    pub async fn get(&self, conn: &mut SqliteConnection, id: i64) -> DbResult<Option<CustomerType>> {
        let customer_type = sqlx::query_as::<_, CustomerType>(
            "SELECT id, name, description FROM customer_types WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(customer_type)
    }

    /// Lists all customer types ordered by name.
    pub async fn list(&self, conn: &mut SqliteConnection) -> DbResult<Vec<CustomerType>> {
        let types = sqlx::query_as::<_, CustomerType>(
            "SELECT id, name, description FROM customer_types ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig, DbError};

    fn new_type(name: &str) -> NewCustomerType {
        NewCustomerType {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_insert_get_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut tx = db.begin().await.unwrap();
        let repo = db.customer_types();

        let wholesale = repo.insert(&mut tx, &new_type("Wholesale")).await.unwrap();
        let retail = repo.insert(&mut tx, &new_type("Retail")).await.unwrap();

        assert_eq!(repo.get(&mut tx, retail.id).await.unwrap(), Some(retail.clone()));
        assert!(repo.get(&mut tx, 424242).await.unwrap().is_none());

        let names: Vec<String> = repo
            .list(&mut tx)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec![retail.name, wholesale.name]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut tx = db.begin().await.unwrap();
        let repo = db.customer_types();

        repo.insert(&mut tx, &new_type("Retail")).await.unwrap();
        let err = repo.insert(&mut tx, &new_type("Retail")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
