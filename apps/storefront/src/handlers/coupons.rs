//! # Coupon Handlers
//!
//! Admin CRUD over coupon rows plus the public validate endpoint, which
//! previews a discount against a cart total without touching any session
//! state.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use aisle_core::validation::{validate_coupon_code, validate_price_cents};
use aisle_core::{discount_cents, CoreError, Coupon, CouponKind, Money, ValidationError};
use aisle_db::repository::coupon::generate_coupon_id;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::response::{paginated, ApiResponse};
use crate::state::AppState;

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CouponPayload {
    pub code: String,
    /// "fixed" or "percent".
    pub kind: String,
    /// Cents for fixed coupons, basis points for percent coupons.
    pub value: i64,
    pub cart_value_cents: i64,
    /// Last day the coupon is redeemable (inclusive), ISO date.
    pub expiry_date: NaiveDate,
}

impl CouponPayload {
    fn validate(&self, today: NaiveDate) -> Result<CouponKind, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_coupon_code(&self.code) {
            errors.push(e);
        }
        if self.value < 0 {
            errors.push(ValidationError::OutOfRange {
                field: "value".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
        if let Err(e) = validate_price_cents("cart_value_cents", self.cart_value_cents) {
            errors.push(e);
        }
        if self.expiry_date < today {
            errors.push(ValidationError::InvalidFormat {
                field: "expiry_date".to_string(),
                reason: "must not be in the past".to_string(),
            });
        }

        let kind = CouponKind::parse(&self.kind);
        if kind.is_none() {
            errors.push(ValidationError::InvalidFormat {
                field: "kind".to_string(),
                reason: "must be one of: fixed, percent".to_string(),
            });
        }

        match kind {
            Some(kind) if errors.is_empty() => Ok(kind),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Admin CRUD
// =============================================================================

/// GET /coupons
pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .db
        .coupons()
        .list(query.page(), query.per_page(12))
        .await?;
    Ok(paginated(page))
}

/// GET /coupons/:id
pub async fn show(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let coupon = state
        .db
        .coupons()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Coupon", &id))?;
    Ok(ApiResponse::data(coupon))
}

/// POST /coupons
pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CouponPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(code = %payload.code, "create coupon");

    let today = Utc::now().date_naive();
    let kind = payload.validate(today).map_err(ApiError::validation_fields)?;

    let now = Utc::now();
    let coupon = Coupon {
        id: generate_coupon_id(),
        code: payload.code.trim().to_string(),
        kind,
        value: payload.value,
        cart_value_cents: payload.cart_value_cents,
        expiry_date: payload.expiry_date,
        created_at: now,
        updated_at: now,
    };
    state.db.coupons().insert(&coupon).await?;

    Ok(ApiResponse::data_with_message(coupon, "Coupon created successfully").created())
}

/// PUT /coupons/:id
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CouponPayload>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "update coupon");

    let today = Utc::now().date_naive();
    let kind = payload.validate(today).map_err(ApiError::validation_fields)?;

    let mut coupon = state
        .db
        .coupons()
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Coupon", &id))?;

    coupon.code = payload.code.trim().to_string();
    coupon.kind = kind;
    coupon.value = payload.value;
    coupon.cart_value_cents = payload.cart_value_cents;
    coupon.expiry_date = payload.expiry_date;
    state.db.coupons().update(&coupon).await?;

    Ok(ApiResponse::data_with_message(coupon, "Coupon updated successfully"))
}

/// DELETE /coupons/:id
pub async fn destroy(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(id = %id, "delete coupon");

    state.db.coupons().delete(&id).await?;
    Ok(ApiResponse::message("Coupon deleted successfully"))
}

// =============================================================================
// Validate Endpoint
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ValidateCouponRequest {
    pub code: String,
    pub cart_total_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct ValidateCouponResponse {
    pub coupon: Coupon,
    pub discount_cents: i64,
    pub final_total_cents: i64,
}

/// POST /coupons/validate
///
/// Stateless preview: resolves the code, checks the minimum and reports
/// the discount the coupon would grant on the given total.
pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateCouponRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_coupon_code(&request.code)?;
    validate_price_cents("cart_total_cents", request.cart_total_cents)?;

    let today = Utc::now().date_naive();
    let coupon = state
        .db
        .coupons()
        .find_active(request.code.trim(), today)
        .await?
        .ok_or(CoreError::CouponNotFound {
            code: request.code.trim().to_string(),
        })?;

    if request.cart_total_cents < coupon.cart_value_cents {
        return Err(CoreError::CouponBelowMinimum {
            required_cents: coupon.cart_value_cents,
        }
        .into());
    }

    let total = Money::from_cents(request.cart_total_cents);
    let discount = discount_cents(coupon.kind, coupon.value, total);
    let final_total = total - discount;

    Ok(ApiResponse::data(ValidateCouponResponse {
        coupon,
        discount_cents: discount.cents(),
        final_total_cents: final_total.cents(),
    }))
}
