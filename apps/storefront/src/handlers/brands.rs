//! # Brand Handlers
//!
//! Listing is public; mutations require an admin.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use aisle_core::validation::{slugify, validate_name, validate_slug};
use aisle_core::Brand;
use aisle_db::repository::brand::generate_brand_id;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::response::{paginated, ApiResponse};
use crate::state::AppState;

/// Create/update payload. `slug` defaults to a slugified `name`; `image`
/// is the stored filename (uploads are handled upstream) and is only
/// replaced when present.
#[derive(Debug, Deserialize)]
pub struct BrandPayload {
    pub name: String,
    pub slug: Option<String>,
    pub image: Option<String>,
}

impl BrandPayload {
    fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
            _ => slugify(&self.name),
        }
    }
}

/// Rejects a slug already taken by another brand, reporting it as a field
/// error. `except_id` exempts the row being updated.
async fn check_slug_free(
    state: &AppState,
    slug: &str,
    except_id: Option<&str>,
) -> Result<(), ApiError> {
    if let Some(existing) = state.db.brands().get_by_slug(slug).await? {
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

/// GET /brands
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .db
        .brands()
        .list(query.page(), query.per_page(10))
        .await?;
    Ok(paginated(page))
}

/// GET /brands/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = state
        .db
        .brands()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Brand", &id))?;
    Ok(ApiResponse::data(brand))
}

/// POST /brands
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<BrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(name = %payload.name, "create brand");

    validate_name("name", &payload.name)?;
    let slug = payload.resolved_slug();
    validate_slug(&slug)?;
    check_slug_free(&state, &slug, None).await?;

    let now = Utc::now();
    let brand = Brand {
        id: generate_brand_id(),
        name: payload.name.trim().to_string(),
        slug,
        image: payload.image,
        created_at: now,
        updated_at: now,
    };
    state.db.brands().insert(&brand).await?;

    Ok(ApiResponse::data_with_message(brand, "Brand created successfully").created())
}

/// PUT /brands/:id
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<BrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "update brand");

    validate_name("name", &payload.name)?;
    let slug = payload.resolved_slug();
    validate_slug(&slug)?;
    check_slug_free(&state, &slug, Some(&id)).await?;

    let mut brand = state
        .db
        .brands()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Brand", &id))?;

    brand.name = payload.name.trim().to_string();
    brand.slug = slug;
    if payload.image.is_some() {
        brand.image = payload.image;
    }
    state.db.brands().update(&brand).await?;

    Ok(ApiResponse::data_with_message(brand, "Brand updated successfully"))
}

/// DELETE /brands/:id
pub async fn destroy(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "delete brand");

    state.db.brands().delete(&id).await?;
    Ok(ApiResponse::message("Brand deleted successfully"))
}
