//! # Order Repository
//!
//! Database operations for orders, their frozen line items and the
//! one-to-one payment transaction.
//!
//! ## Placement Transaction
//! `place_order` is the only multi-statement write in the system. The
//! order row, every item row and the transaction row are inserted inside
//! one database transaction: a failure on any insert (constraint
//! violation, pool loss) rolls back the whole group, so a "confirmed"
//! order can never exist without its items or payment record.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{page_bounds, Page};
use aisle_core::{Order, OrderItem, OrderStatus, Transaction};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order, its items and its transaction as one unit.
    ///
    /// All three groups commit together or not at all.
    pub async fn place_order(
        &self,
        order: &Order,
        items: &[OrderItem],
        transaction: &Transaction,
    ) -> DbResult<()> {
        debug!(order_id = %order.id, items = items.len(), "Placing order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (
                id, user_id, subtotal_cents, discount_cents, tax_cents, total_cents,
                name, phone, locality, address, city, state, country, landmark, zip,
                status, delivered_date, canceled_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                      ?16, ?17, ?18, ?19, ?20)",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.subtotal_cents)
        .bind(order.discount_cents)
        .bind(order.tax_cents)
        .bind(order.total_cents)
        .bind(&order.name)
        .bind(&order.phone)
        .bind(&order.locality)
        .bind(&order.address)
        .bind(&order.city)
        .bind(&order.state)
        .bind(&order.country)
        .bind(&order.landmark)
        .bind(&order.zip)
        .bind(order.status)
        .bind(order.delivered_date)
        .bind(order.canceled_date)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, price_cents, quantity, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(item.price_cents)
            .bind(item.quantity)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            "INSERT INTO transactions (id, user_id, order_id, mode, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(&transaction.order_id)
        .bind(transaction.mode)
        .bind(transaction.status)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(order_id = %order.id, total = order.total_cents, items = items.len(), "Order placed");
        Ok(())
    }

    /// Lists orders newest-first.
    pub async fn list(&self, page: u32, per_page: u32) -> DbResult<Page<Order>> {
        let (page, per_page, limit, offset) = page_bounds(page, per_page);

        let items = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Gets an order by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Gets all items of an order.
    pub async fn items_for_order(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = ?1 ORDER BY created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets the transaction attached to an order.
    pub async fn transaction_for_order(&self, order_id: &str) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE order_id = ?1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Updates an order's status.
    ///
    /// Side effects by status, all inside one database transaction:
    /// - `delivered`: stamps `delivered_date` and flips the order's
    ///   transaction to `approved`. A missing transaction row is a
    ///   data-integrity error; the status change is rolled back and
    ///   `DbError::NotFound("Transaction", ..)` is returned.
    /// - `canceled`: stamps `canceled_date`; the transaction is untouched.
    /// - anything else: stores the value, nothing more.
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(order_id = %order_id, status = status.as_str(), "Updating order status");

        let mut tx = self.pool.begin().await?;

        let sql = match status {
            OrderStatus::Delivered => {
                "UPDATE orders SET status = ?2, delivered_date = ?3, updated_at = ?3 WHERE id = ?1"
            }
            OrderStatus::Canceled => {
                "UPDATE orders SET status = ?2, canceled_date = ?3, updated_at = ?3 WHERE id = ?1"
            }
            _ => "UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1",
        };

        let result = sqlx::query(sql)
            .bind(order_id)
            .bind(status)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        if status == OrderStatus::Delivered {
            let result = sqlx::query(
                "UPDATE transactions SET status = 'approved', updated_at = ?2 WHERE order_id = ?1",
            )
            .bind(order_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            // Dropping tx here rolls the status change back with it.
            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Transaction", order_id));
            }
        }

        tx.commit().await?;

        info!(order_id = %order_id, status = status.as_str(), "Order status updated");
        Ok(())
    }
}

/// Helper to generate a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new order item ID.
pub fn generate_order_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Helper to generate a new transaction ID.
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::brand::generate_brand_id;
    use crate::repository::category::generate_category_id;
    use crate::repository::product::generate_product_id;
    use aisle_core::{
        Brand, Category, PaymentMode, Product, StockStatus, TransactionStatus,
    };

    async fn seeded_db(product_count: usize) -> (Database, Vec<String>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        let brand = Brand {
            id: generate_brand_id(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            image: None,
            created_at: now,
            updated_at: now,
        };
        db.brands().insert(&brand).await.unwrap();

        let category = Category {
            id: generate_category_id(),
            name: "Shoes".to_string(),
            slug: "shoes".to_string(),
            image: None,
            created_at: now,
            updated_at: now,
        };
        db.categories().insert(&category).await.unwrap();

        let mut product_ids = Vec::new();
        for i in 0..product_count {
            let product = Product {
                id: generate_product_id(),
                name: format!("Product {}", i),
                slug: format!("product-{}", i),
                short_description: "short".to_string(),
                description: "long".to_string(),
                regular_price_cents: 1000 * (i as i64 + 1),
                sale_price_cents: 900 * (i as i64 + 1),
                sku: format!("SKU-{}", i),
                stock_status: StockStatus::InStock,
                featured: false,
                quantity: 10,
                image: None,
                images: None,
                category_id: category.id.clone(),
                brand_id: brand.id.clone(),
                created_at: now,
                updated_at: now,
            };
            db.products().insert(&product).await.unwrap();
            product_ids.push(product.id);
        }

        (db, product_ids)
    }

    fn order(user_id: &str, total_cents: i64) -> Order {
        let now = Utc::now();
        Order {
            id: generate_order_id(),
            user_id: user_id.to_string(),
            subtotal_cents: total_cents,
            discount_cents: 0,
            tax_cents: 0,
            total_cents,
            name: "Asha Rao".to_string(),
            phone: "9876543210".to_string(),
            locality: "Midtown".to_string(),
            address: "12 High St".to_string(),
            city: "Bengaluru".to_string(),
            state: "KA".to_string(),
            country: "".to_string(),
            landmark: "Near park".to_string(),
            zip: "560001".to_string(),
            status: OrderStatus::Pending,
            delivered_date: None,
            canceled_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn item(order_id: &str, product_id: &str, price_cents: i64, quantity: i64) -> OrderItem {
        OrderItem {
            id: generate_order_item_id(),
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
            price_cents,
            quantity,
            created_at: Utc::now(),
        }
    }

    fn pending_transaction(order_id: &str, user_id: &str) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: generate_transaction_id(),
            user_id: user_id.to_string(),
            order_id: order_id.to_string(),
            mode: PaymentMode::Cod,
            status: TransactionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_place_order_creates_all_records() {
        let (db, product_ids) = seeded_db(3).await;
        let repo = db.orders();

        let o = order("u1", 5400);
        let items: Vec<OrderItem> = product_ids
            .iter()
            .enumerate()
            .map(|(i, pid)| item(&o.id, pid, 900 * (i as i64 + 1), 1))
            .collect();
        let t = pending_transaction(&o.id, "u1");

        repo.place_order(&o, &items, &t).await.unwrap();

        let stored = repo.get(&o.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.total_cents, 5400);
        assert_eq!(stored.name, "Asha Rao");

        let stored_items = repo.items_for_order(&o.id).await.unwrap();
        assert_eq!(stored_items.len(), 3);
        for (stored, original) in stored_items.iter().zip(items.iter()) {
            assert_eq!(stored.product_id, original.product_id);
            assert_eq!(stored.price_cents, original.price_cents);
            assert_eq!(stored.quantity, original.quantity);
        }

        let stored_tx = repo.transaction_for_order(&o.id).await.unwrap().unwrap();
        assert_eq!(stored_tx.status, TransactionStatus::Pending);
        assert_eq!(stored_tx.mode, PaymentMode::Cod);
    }

    #[tokio::test]
    async fn test_place_order_rolls_back_on_bad_item() {
        let (db, product_ids) = seeded_db(1).await;
        let repo = db.orders();

        let o = order("u1", 900);
        // Second item references a product that does not exist; the FK
        // failure must take the order row down with it.
        let items = vec![
            item(&o.id, &product_ids[0], 900, 1),
            item(&o.id, "no-such-product", 100, 1),
        ];
        let t = pending_transaction(&o.id, "u1");

        let err = repo.place_order(&o, &items, &t).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        assert!(repo.get(&o.id).await.unwrap().is_none());
        assert!(repo.items_for_order(&o.id).await.unwrap().is_empty());
        assert!(repo.transaction_for_order(&o.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delivered_stamps_date_and_approves_transaction() {
        let (db, product_ids) = seeded_db(1).await;
        let repo = db.orders();

        let o = order("u1", 900);
        let items = vec![item(&o.id, &product_ids[0], 900, 1)];
        let t = pending_transaction(&o.id, "u1");
        repo.place_order(&o, &items, &t).await.unwrap();

        let now = Utc::now();
        repo.update_status(&o.id, OrderStatus::Delivered, now).await.unwrap();

        let stored = repo.get(&o.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Delivered);
        assert_eq!(stored.delivered_date, Some(now));
        assert_eq!(stored.canceled_date, None);

        let stored_tx = repo.transaction_for_order(&o.id).await.unwrap().unwrap();
        assert_eq!(stored_tx.status, TransactionStatus::Approved);
    }

    #[tokio::test]
    async fn test_canceled_stamps_date_and_leaves_transaction() {
        let (db, product_ids) = seeded_db(1).await;
        let repo = db.orders();

        let o = order("u1", 900);
        let items = vec![item(&o.id, &product_ids[0], 900, 1)];
        let t = pending_transaction(&o.id, "u1");
        repo.place_order(&o, &items, &t).await.unwrap();

        let now = Utc::now();
        repo.update_status(&o.id, OrderStatus::Canceled, now).await.unwrap();

        let stored = repo.get(&o.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Canceled);
        assert_eq!(stored.canceled_date, Some(now));
        assert_eq!(stored.delivered_date, None);

        let stored_tx = repo.transaction_for_order(&o.id).await.unwrap().unwrap();
        assert_eq!(stored_tx.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_shipped_has_no_side_effects() {
        let (db, product_ids) = seeded_db(1).await;
        let repo = db.orders();

        let o = order("u1", 900);
        let items = vec![item(&o.id, &product_ids[0], 900, 1)];
        repo.place_order(&o, &items, &pending_transaction(&o.id, "u1"))
            .await
            .unwrap();

        repo.update_status(&o.id, OrderStatus::Shipped, Utc::now()).await.unwrap();

        let stored = repo.get(&o.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Shipped);
        assert_eq!(stored.delivered_date, None);
        assert_eq!(stored.canceled_date, None);
    }

    #[tokio::test]
    async fn test_delivered_without_transaction_rolls_back() {
        let (db, _) = seeded_db(0).await;
        let repo = db.orders();

        // Insert a bare order row outside place_order so no transaction
        // record exists - the data-integrity case.
        let o = order("u1", 900);
        sqlx::query(
            "INSERT INTO orders (
                id, user_id, subtotal_cents, discount_cents, tax_cents, total_cents,
                name, phone, locality, address, city, state, country, landmark, zip,
                status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, 0, 0, ?3, ?4, ?5, ?6, ?7, ?8, ?9, '', ?10, ?11,
                      'pending', ?12, ?12)",
        )
        .bind(&o.id)
        .bind(&o.user_id)
        .bind(o.total_cents)
        .bind(&o.name)
        .bind(&o.phone)
        .bind(&o.locality)
        .bind(&o.address)
        .bind(&o.city)
        .bind(&o.state)
        .bind(&o.landmark)
        .bind(&o.zip)
        .bind(o.created_at)
        .execute(db.pool())
        .await
        .unwrap();

        let err = repo
            .update_status(&o.id, OrderStatus::Delivered, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Transaction"));

        // The order status change rolled back with the failed cascade.
        let stored = repo.get(&o.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.delivered_date, None);
    }

    #[tokio::test]
    async fn test_update_status_missing_order() {
        let (db, _) = seeded_db(0).await;
        let err = db
            .orders()
            .update_status("ghost", OrderStatus::Processing, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "Order"));
    }
}
