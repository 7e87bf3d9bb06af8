//! # Category Repository
//!
//! Database operations for categories. Mirrors the brand repository.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{page_bounds, Page};
use aisle_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories newest-first.
    pub async fn list(&self, page: u32, per_page: u32) -> DbResult<Page<Category>> {
        let (page, per_page, limit, offset) = page_bounds(page, per_page);

        let items = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Lists all categories ordered by name, for storefront filters and
    /// admin select lists.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let items = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(slug = %category.slug, "Inserting category");

        sqlx::query(
            "INSERT INTO categories (id, name, slug, image, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.image)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, "Updating category");

        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE categories SET name = ?2, slug = ?3, image = ?4, updated_at = ?5 WHERE id = ?1",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.image)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

/// Helper to generate a new category ID.
pub fn generate_category_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_crud_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();
        let now = Utc::now();

        let mut cat = Category {
            id: generate_category_id(),
            name: "Shoes".to_string(),
            slug: "shoes".to_string(),
            image: None,
            created_at: now,
            updated_at: now,
        };
        repo.insert(&cat).await.unwrap();

        cat.name = "Footwear".to_string();
        repo.update(&cat).await.unwrap();
        assert_eq!(repo.get(&cat.id).await.unwrap().unwrap().name, "Footwear");

        repo.delete(&cat.id).await.unwrap();
        assert!(repo.get(&cat.id).await.unwrap().is_none());
    }
}
