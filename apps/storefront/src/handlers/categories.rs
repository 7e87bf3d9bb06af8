//! # Category Handlers
//!
//! Mirrors the brand handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use aisle_core::validation::{slugify, validate_name, validate_slug};
use aisle_core::Category;
use aisle_db::repository::category::generate_category_id;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::response::{paginated, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub slug: Option<String>,
    pub image: Option<String>,
}

impl CategoryPayload {
    fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
            _ => slugify(&self.name),
        }
    }
}

/// Rejects a slug already taken by another category, reporting it as a
/// field error. `except_id` exempts the row being updated.
async fn check_slug_free(
    state: &AppState,
    slug: &str,
    except_id: Option<&str>,
) -> Result<(), ApiError> {
    if let Some(existing) = state.db.categories().get_by_slug(slug).await? {
        if except_id != Some(existing.id.as_str()) {
            return Err(ApiError::validation_fields(vec![
                aisle_core::ValidationError::InvalidFormat {
                    field: "slug".to_string(),
                    reason: "already taken".to_string(),
                },
            ]));
        }
    }
    Ok(())
}

/// GET /categories
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .db
        .categories()
        .list(query.page(), query.per_page(10))
        .await?;
    Ok(paginated(page))
}

/// GET /categories/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .db
        .categories()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", &id))?;
    Ok(ApiResponse::data(category))
}

/// POST /categories
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(name = %payload.name, "create category");

    validate_name("name", &payload.name)?;
    let slug = payload.resolved_slug();
    validate_slug(&slug)?;
    check_slug_free(&state, &slug, None).await?;

    let now = Utc::now();
    let category = Category {
        id: generate_category_id(),
        name: payload.name.trim().to_string(),
        slug,
        image: payload.image,
        created_at: now,
        updated_at: now,
    };
    state.db.categories().insert(&category).await?;

    Ok(ApiResponse::data_with_message(category, "Category created successfully").created())
}

/// PUT /categories/:id
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "update category");

    validate_name("name", &payload.name)?;
    let slug = payload.resolved_slug();
    validate_slug(&slug)?;
    check_slug_free(&state, &slug, Some(&id)).await?;

    let mut category = state
        .db
        .categories()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", &id))?;

    category.name = payload.name.trim().to_string();
    category.slug = slug;
    if payload.image.is_some() {
        category.image = payload.image;
    }
    state.db.categories().update(&category).await?;

    Ok(ApiResponse::data_with_message(category, "Category updated successfully"))
}

/// DELETE /categories/:id
pub async fn destroy(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "delete category");

    state.db.categories().delete(&id).await?;
    Ok(ApiResponse::message("Category deleted successfully"))
}
