//! # Product Repository
//!
//! Database operations for the product catalog: paginated storefront
//! listing with the shopper-facing sort orders, slug lookup for product
//! detail pages, a related-products sample, and the admin CRUD.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{page_bounds, Page};
use aisle_core::Product;

// =============================================================================
// Sort Orders
// =============================================================================

/// Storefront listing sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Insertion order (no explicit ORDER BY beyond rowid).
    #[default]
    Default,
    /// Newest first.
    Date,
    /// Cheapest first, by list price.
    PriceAsc,
    /// Most expensive first, by list price.
    PriceDesc,
}

impl ProductSort {
    /// Parses the storefront query value; unknown values fall back to
    /// the default ordering rather than erroring.
    pub fn parse(value: &str) -> Self {
        match value {
            "date" => ProductSort::Date,
            "price" => ProductSort::PriceAsc,
            "price-desc" => ProductSort::PriceDesc,
            _ => ProductSort::Default,
        }
    }

    const fn order_clause(&self) -> &'static str {
        match self {
            ProductSort::Default => "rowid",
            ProductSort::Date => "created_at DESC",
            ProductSort::PriceAsc => "regular_price_cents ASC",
            ProductSort::PriceDesc => "regular_price_cents DESC",
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products with the given sort order.
    pub async fn list(&self, sort: ProductSort, page: u32, per_page: u32) -> DbResult<Page<Product>> {
        let (page, per_page, limit, offset) = page_bounds(page, per_page);

        // ORDER BY cannot be bound as a parameter; the clause comes from
        // the closed ProductSort set, never from raw input.
        let sql = format!(
            "SELECT * FROM products ORDER BY {} LIMIT ?1 OFFSET ?2",
            sort.order_clause()
        );

        let items = sqlx::query_as::<_, Product>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Gets a product by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by slug (product detail pages).
    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Returns up to `limit` other products for the "related" strip on a
    /// product detail page.
    pub async fn related(&self, slug: &str, limit: u32) -> DbResult<Vec<Product>> {
        let items = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE slug <> ?1 LIMIT ?2",
        )
        .bind(slug)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(slug = %product.slug, sku = %product.sku, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, name, slug, short_description, description,
                regular_price_cents, sale_price_cents, sku, stock_status,
                featured, quantity, image, images, category_id, brand_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.short_description)
        .bind(&product.description)
        .bind(product.regular_price_cents)
        .bind(product.sale_price_cents)
        .bind(&product.sku)
        .bind(product.stock_status)
        .bind(product.featured)
        .bind(product.quantity)
        .bind(&product.image)
        .bind(&product.images)
        .bind(&product.category_id)
        .bind(&product.brand_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE products SET
                name = ?2, slug = ?3, short_description = ?4, description = ?5,
                regular_price_cents = ?6, sale_price_cents = ?7, sku = ?8,
                stock_status = ?9, featured = ?10, quantity = ?11,
                image = ?12, images = ?13, category_id = ?14, brand_id = ?15,
                updated_at = ?16
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.short_description)
        .bind(&product.description)
        .bind(product.regular_price_cents)
        .bind(product.sale_price_cents)
        .bind(&product.sku)
        .bind(product.stock_status)
        .bind(product.featured)
        .bind(product.quantity)
        .bind(&product.image)
        .bind(&product.images)
        .bind(&product.category_id)
        .bind(&product.brand_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
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
    use aisle_core::{Brand, Category, StockStatus};

    async fn seeded_db() -> (Database, String, String) {
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

        (db, brand.id, category.id)
    }

    fn product(name: &str, slug: &str, price: i64, brand_id: &str, category_id: &str) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            name: name.to_string(),
            slug: slug.to_string(),
            short_description: "short".to_string(),
            description: "long".to_string(),
            regular_price_cents: price,
            sale_price_cents: price - 100,
            sku: format!("SKU-{}", slug),
            stock_status: StockStatus::InStock,
            featured: false,
            quantity: 10,
            image: None,
            images: None,
            category_id: category_id.to_string(),
            brand_id: brand_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_get_by_slug_and_related() {
        let (db, brand_id, category_id) = seeded_db().await;
        let repo = db.products();

        repo.insert(&product("Runner", "runner", 5000, &brand_id, &category_id))
            .await
            .unwrap();
        repo.insert(&product("Walker", "walker", 4000, &brand_id, &category_id))
            .await
            .unwrap();

        let found = repo.get_by_slug("runner").await.unwrap().unwrap();
        assert_eq!(found.name, "Runner");
        assert_eq!(found.stock_status, StockStatus::InStock);

        let related = repo.related("runner", 8).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].slug, "walker");
    }

    #[tokio::test]
    async fn test_price_sorting() {
        let (db, brand_id, category_id) = seeded_db().await;
        let repo = db.products();

        repo.insert(&product("Mid", "mid", 5000, &brand_id, &category_id))
            .await
            .unwrap();
        repo.insert(&product("Cheap", "cheap", 1000, &brand_id, &category_id))
            .await
            .unwrap();
        repo.insert(&product("Dear", "dear", 9000, &brand_id, &category_id))
            .await
            .unwrap();

        let asc = repo.list(ProductSort::PriceAsc, 1, 10).await.unwrap();
        let slugs: Vec<&str> = asc.items.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["cheap", "mid", "dear"]);

        let desc = repo.list(ProductSort::PriceDesc, 1, 10).await.unwrap();
        assert_eq!(desc.items[0].slug, "dear");
    }

    #[tokio::test]
    async fn test_dangling_references_rejected() {
        let (db, brand_id, _category_id) = seeded_db().await;
        let repo = db.products();

        let err = repo
            .insert(&product("Orphan", "orphan", 1000, &brand_id, "no-such-category"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(ProductSort::parse("date"), ProductSort::Date);
        assert_eq!(ProductSort::parse("price"), ProductSort::PriceAsc);
        assert_eq!(ProductSort::parse("price-desc"), ProductSort::PriceDesc);
        assert_eq!(ProductSort::parse("default"), ProductSort::Default);
        assert_eq!(ProductSort::parse("garbage"), ProductSort::Default);
    }
}
