//! # Address Repository
//!
//! Database operations for customer shipping addresses. Checkout resolves
//! the user's default address; when none exists the validated form input is
//! persisted as the new default.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use aisle_core::Address;

/// Repository for address database operations.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: SqlitePool,
}

impl AddressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository { pool }
    }

    /// Gets the user's default shipping address, if any.
    pub async fn default_for_user(&self, user_id: &str) -> DbResult<Option<Address>> {
        let address = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE user_id = ?1 AND is_default = 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(address)
    }

    /// Inserts an address. Callers set `is_default` before insert; the
    /// first address a user saves at checkout becomes their default.
    pub async fn insert(&self, address: &Address) -> DbResult<()> {
        debug!(user_id = %address.user_id, "Inserting address");

        sqlx::query(
            "INSERT INTO addresses (
                id, user_id, name, phone, locality, address, city, state,
                landmark, zip, country, is_default, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&address.id)
        .bind(&address.user_id)
        .bind(&address.name)
        .bind(&address.phone)
        .bind(&address.locality)
        .bind(&address.address)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.landmark)
        .bind(&address.zip)
        .bind(&address.country)
        .bind(address.is_default)
        .bind(address.created_at)
        .bind(address.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Helper to generate a new address ID.
pub fn generate_address_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn address(user_id: &str, is_default: bool) -> Address {
        let now = Utc::now();
        Address {
            id: generate_address_id(),
            user_id: user_id.to_string(),
            name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            locality: "Midtown".to_string(),
            address: "12 High St".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            landmark: "Near park".to_string(),
            zip: "560001".to_string(),
            country: "".to_string(),
            is_default,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_default_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.addresses();

        assert!(repo.default_for_user("u1").await.unwrap().is_none());

        repo.insert(&address("u1", false)).await.unwrap();
        assert!(repo.default_for_user("u1").await.unwrap().is_none());

        let default = address("u1", true);
        repo.insert(&default).await.unwrap();
        let found = repo.default_for_user("u1").await.unwrap().unwrap();
        assert_eq!(found.id, default.id);

        // Other users see nothing.
        assert!(repo.default_for_user("u2").await.unwrap().is_none());
    }
}
