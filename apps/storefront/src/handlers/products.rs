//! # Product Handlers
//!
//! The storefront listing (`/shop`) and detail page plus the admin CRUD.
//! Catalog writes validate every field and report failures together,
//! the way the shop's admin forms expect.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use aisle_core::validation::{
    slugify, validate_name, validate_price_cents, validate_required, validate_slug,
};
use aisle_core::{join_gallery, Product, StockStatus, ValidationError};
use aisle_db::repository::product::generate_product_id;
use aisle_db::ProductSort;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::response::{paginated, ApiResponse};
use crate::state::AppState;

/// Number of products shown in the "related" strip on a detail page.
const RELATED_LIMIT: u32 = 8;

// =============================================================================
// Payloads
// =============================================================================

/// Create/update payload. Gallery images arrive as a list of filenames and
/// are stored joined with the canonical separator.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub slug: Option<String>,
    pub short_description: String,
    pub description: String,
    pub regular_price_cents: i64,
    pub sale_price_cents: i64,
    pub sku: String,
    pub stock_status: String,
    pub featured: bool,
    pub quantity: i64,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_id: String,
    pub brand_id: String,
}

impl ProductPayload {
    fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
            _ => slugify(&self.name),
        }
    }

    /// Validates every field, collecting all failures.
    fn validate(&self) -> Result<StockStatus, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_name("name", &self.name) {
            errors.push(e);
        }
        if let Err(e) = validate_slug(&self.resolved_slug()) {
            errors.push(e);
        }
        if let Err(e) = validate_required("short_description", &self.short_description) {
            errors.push(e);
        }
        if let Err(e) = validate_required("description", &self.description) {
            errors.push(e);
        }
        if let Err(e) = validate_price_cents("regular_price_cents", self.regular_price_cents) {
            errors.push(e);
        }
        if let Err(e) = validate_price_cents("sale_price_cents", self.sale_price_cents) {
            errors.push(e);
        }
        if let Err(e) = validate_required("sku", &self.sku) {
            errors.push(e);
        }
        if self.quantity < 0 {
            errors.push(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }

        let stock_status = StockStatus::parse(&self.stock_status);
        if stock_status.is_none() {
            errors.push(ValidationError::InvalidFormat {
                field: "stock_status".to_string(),
                reason: "must be one of: instock, outofstock".to_string(),
            });
        }

        match stock_status {
            Some(status) if errors.is_empty() => Ok(status),
            _ => Err(errors),
        }
    }
}

/// Checks the cross-record rules: the referenced category and brand must
/// exist, and the slug must not belong to another product. Failures are
/// reported as field errors like any other invalid input; `except_id`
/// exempts the row being updated from the slug check.
async fn check_references(
    state: &AppState,
    payload: &ProductPayload,
    except_id: Option<&str>,
) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if state.db.categories().get(&payload.category_id).await?.is_none() {
        errors.push(ValidationError::InvalidFormat {
            field: "category_id".to_string(),
            reason: "unknown category".to_string(),
        });
    }
    if state.db.brands().get(&payload.brand_id).await?.is_none() {
        errors.push(ValidationError::InvalidFormat {
            field: "brand_id".to_string(),
            reason: "unknown brand".to_string(),
        });
    }
    if let Some(existing) = state.db.products().get_by_slug(&payload.resolved_slug()).await? {
        if except_id != Some(existing.id.as_str()) {
            errors.push(ValidationError::InvalidFormat {
                field: "slug".to_string(),
                reason: "already taken".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_fields(errors))
    }
}

// =============================================================================
// Storefront
// =============================================================================

/// GET /shop - storefront listing with shopper-facing sort orders.
pub async fn shop(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sort = ProductSort::parse(query.sorting.as_deref().unwrap_or("default"));
    let page = state
        .db
        .products()
        .list(sort, query.page(), query.per_page(12))
        .await?;
    Ok(paginated(page))
}

#[derive(Debug, Serialize)]
pub struct ProductDetails {
    pub product: Product,
    pub related: Vec<Product>,
}

/// GET /shop/:slug - product detail page with a related-products strip.
pub async fn details(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .db
        .products()
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &slug))?;
    let related = state.db.products().related(&slug, RELATED_LIMIT).await?;

    Ok(ApiResponse::data(ProductDetails { product, related }))
}

// =============================================================================
// Admin CRUD
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ProductFormData {
    pub categories: Vec<aisle_core::Category>,
    pub brands: Vec<aisle_core::Brand>,
}

/// GET /products/create - select-list data for the admin product form.
pub async fn create_form(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.db.categories().list_all().await?;
    let brands = state.db.brands().list_all().await?;
    Ok(ApiResponse::data(ProductFormData { categories, brands }))
}

/// GET /products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .db
        .products()
        .list(ProductSort::Date, query.page(), query.per_page(10))
        .await?;
    Ok(paginated(page))
}

/// GET /products/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state
        .db
        .products()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;
    Ok(ApiResponse::data(product))
}

/// POST /products
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(name = %payload.name, sku = %payload.sku, "create product");

    let stock_status = payload.validate().map_err(ApiError::validation_fields)?;
    check_references(&state, &payload, None).await?;

    let now = Utc::now();
    let product = Product {
        id: generate_product_id(),
        name: payload.name.trim().to_string(),
        slug: payload.resolved_slug(),
        short_description: payload.short_description,
        description: payload.description,
        regular_price_cents: payload.regular_price_cents,
        sale_price_cents: payload.sale_price_cents,
        sku: payload.sku,
        stock_status,
        featured: payload.featured,
        quantity: payload.quantity,
        image: payload.image,
        images: payload.images.as_deref().map(join_gallery),
        category_id: payload.category_id,
        brand_id: payload.brand_id,
        created_at: now,
        updated_at: now,
    };
    state.db.products().insert(&product).await?;

    Ok(ApiResponse::data_with_message(product, "Product created successfully").created())
}

/// PUT /products/:id
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "update product");

    let stock_status = payload.validate().map_err(ApiError::validation_fields)?;
    check_references(&state, &payload, Some(&id)).await?;

    let mut product = state
        .db
        .products()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    product.name = payload.name.trim().to_string();
    product.slug = payload.resolved_slug();
    product.short_description = payload.short_description;
    product.description = payload.description;
    product.regular_price_cents = payload.regular_price_cents;
    product.sale_price_cents = payload.sale_price_cents;
    product.sku = payload.sku;
    product.stock_status = stock_status;
    product.featured = payload.featured;
    product.quantity = payload.quantity;
    product.category_id = payload.category_id;
    product.brand_id = payload.brand_id;
    if payload.image.is_some() {
        product.image = payload.image;
    }
    if let Some(images) = payload.images.as_deref() {
        product.images = Some(join_gallery(images));
    }
    state.db.products().update(&product).await?;

    Ok(ApiResponse::data_with_message(product, "Product updated successfully"))
}

/// DELETE /products/:id
pub async fn destroy(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "delete product");

    state.db.products().delete(&id).await?;
    Ok(ApiResponse::message("Product deleted successfully"))
}
