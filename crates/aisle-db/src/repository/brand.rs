//! # Brand Repository
//!
//! Database operations for brands. Plain CRUD with paginated listing;
//! the `slug` column carries a unique index, so inserting or renaming to a
//! taken slug surfaces as [`DbError::UniqueViolation`].

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{page_bounds, Page};
use aisle_core::Brand;

/// Repository for brand database operations.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    /// Creates a new BrandRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BrandRepository { pool }
    }

    /// Lists brands newest-first.
    pub async fn list(&self, page: u32, per_page: u32) -> DbResult<Page<Brand>> {
        let (page, per_page, limit, offset) = page_bounds(page, per_page);

        let items = sqlx::query_as::<_, Brand>(
            "SELECT * FROM brands ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Lists all brands ordered by name, for admin select lists.
    pub async fn list_all(&self) -> DbResult<Vec<Brand>> {
        let items = sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Gets a brand by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(brand)
    }

    /// Gets a brand by slug.
    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Brand>> {
        let brand = sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(brand)
    }

    /// Inserts a new brand.
    pub async fn insert(&self, brand: &Brand) -> DbResult<()> {
        debug!(slug = %brand.slug, "Inserting brand");

        sqlx::query(
            "INSERT INTO brands (id, name, slug, image, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&brand.id)
        .bind(&brand.name)
        .bind(&brand.slug)
        .bind(&brand.image)
        .bind(brand.created_at)
        .bind(brand.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing brand.
    pub async fn update(&self, brand: &Brand) -> DbResult<()> {
        debug!(id = %brand.id, "Updating brand");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE brands SET name = ?2, slug = ?3, image = ?4, updated_at = ?5 WHERE id = ?1",
        )
        .bind(&brand.id)
        .bind(&brand.name)
        .bind(&brand.slug)
        .bind(&brand.image)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", &brand.id));
        }

        Ok(())
    }

    /// Deletes a brand.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting brand");

        let result = sqlx::query("DELETE FROM brands WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Brand", id));
        }

        Ok(())
    }
}

/// Helper to generate a new brand ID.
pub fn generate_brand_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
