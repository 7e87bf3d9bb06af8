//! # Coupon Repository
//!
//! Database operations for coupons. The storefront only ever reads through
//! [`CouponRepository::find_active`], which folds the expiry check into the
//! lookup: an expired code and an unknown code are indistinguishable to the
//! shopper. Admin CRUD works on raw rows regardless of expiry.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{page_bounds, Page};
use aisle_core::Coupon;

/// Repository for coupon database operations.
#[derive(Debug, Clone)]
pub struct CouponRepository {
    pool: SqlitePool,
}

impl CouponRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CouponRepository { pool }
    }

    /// Lists coupons by expiry date, furthest-out first.
    pub async fn list(&self, page: u32, per_page: u32) -> DbResult<Page<Coupon>> {
        let (page, per_page, limit, offset) = page_bounds(page, per_page);

        let items = sqlx::query_as::<_, Coupon>(
            "SELECT * FROM coupons ORDER BY expiry_date DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupons")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Finds a coupon by code that is still active on `today`
    /// (`expiry_date >= today`). Returns `None` for unknown and expired
    /// codes alike.
    pub async fn find_active(&self, code: &str, today: NaiveDate) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(
            "SELECT * FROM coupons WHERE code = ?1 AND expiry_date >= ?2",
        )
        .bind(code)
        .bind(today)
        .fetch_optional(&self.pool)
        .await?;

        Ok(coupon)
    }

    /// Gets a coupon by ID, expired or not.
    pub async fn get(&self, id: &str) -> DbResult<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(coupon)
    }

    /// Inserts a new coupon. Duplicate codes surface as
    /// [`DbError::UniqueViolation`].
    pub async fn insert(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(code = %coupon.code, "Inserting coupon");

        sqlx::query(
            "INSERT INTO coupons (id, code, kind, value, cart_value_cents, expiry_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&coupon.id)
        .bind(&coupon.code)
        .bind(coupon.kind)
        .bind(coupon.value)
        .bind(coupon.cart_value_cents)
        .bind(coupon.expiry_date)
        .bind(coupon.created_at)
        .bind(coupon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing coupon.
    pub async fn update(&self, coupon: &Coupon) -> DbResult<()> {
        debug!(id = %coupon.id, "Updating coupon");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE coupons SET code = ?2, kind = ?3, value = ?4, cart_value_cents = ?5,
                expiry_date = ?6, updated_at = ?7
             WHERE id = ?1",
        )
        .bind(&coupon.id)
        .bind(&coupon.code)
        .bind(coupon.kind)
        .bind(coupon.value)
        .bind(coupon.cart_value_cents)
        .bind(coupon.expiry_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", &coupon.id));
        }

        Ok(())
    }

    /// Deletes a coupon.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting coupon");

        let result = sqlx::query("DELETE FROM coupons WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Coupon", id));
        }

        Ok(())
    }
}

/// Helper to generate a new coupon ID.
pub fn generate_coupon_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use aisle_core::CouponKind;

    fn coupon(code: &str, expiry: NaiveDate) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: generate_coupon_id(),
            code: code.to_string(),
            kind: CouponKind::Percent,
            value: 1000,
            cart_value_cents: 10_000,
            expiry_date: expiry,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_find_active_respects_expiry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();

        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        repo.insert(&coupon("LIVE10", today)).await.unwrap();
        repo.insert(&coupon("DEAD10", today.pred_opt().unwrap()))
            .await
            .unwrap();

        // Expiring today still counts as active.
        assert!(repo.find_active("LIVE10", today).await.unwrap().is_some());
        // Expired yesterday: indistinguishable from an unknown code.
        assert!(repo.find_active("DEAD10", today).await.unwrap().is_none());
        assert!(repo.find_active("NOPE", today).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();
        let expiry = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();

        repo.insert(&coupon("SAVE10", expiry)).await.unwrap();
        let err = repo.insert(&coupon("SAVE10", expiry)).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_get_returns_expired_rows_for_admin() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.coupons();

        let c = coupon("OLD", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        repo.insert(&c).await.unwrap();

        assert!(repo.get(&c.id).await.unwrap().is_some());
    }
}
