//! # Cart Handlers
//!
//! Session cart mutations and the coupon apply/remove flow.
//!
//! The discount snapshot is recomputed after every successful mutation, so
//! the amounts the shopper sees always reflect the current lines and the
//! applied coupon.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use aisle_core::validation::{validate_coupon_code, validate_quantity};
use aisle_core::{AppliedCoupon, CartLine, CoreError, Money, PriceSnapshot, StockStatus};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::session::{Session, SessionId};
use crate::state::AppState;

// =============================================================================
// Cart View
// =============================================================================

/// Cart contents plus the current amounts; `amounts` is absent for an
/// empty cart.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub line_count: usize,
    pub total_quantity: i64,
    pub coupon_code: Option<String>,
    pub amounts: Option<PriceSnapshot>,
}

impl CartView {
    fn from_session(session: &Session) -> Self {
        CartView {
            lines: session.cart.lines.clone(),
            line_count: session.cart.line_count(),
            total_quantity: session.cart.total_quantity(),
            coupon_code: session.coupon.as_ref().map(|c| c.code.clone()),
            amounts: session.discounts,
        }
    }
}

// =============================================================================
// Cart Mutations
// =============================================================================

/// GET /cart
pub async fn get_cart(
    session_id: SessionId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let view = state
        .sessions
        .with_session_mut(&session_id.0, |session| {
            session.recalculate(state.config.tax_rate_bps);
            CartView::from_session(session)
        });
    Ok(ApiResponse::data(view))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: Option<i64>,
}

/// POST /cart/add
///
/// Fetches the product to freeze its current sale price into the line.
pub async fn add_to_cart(
    session_id: SessionId,
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let quantity = request.quantity.unwrap_or(1);
    debug!(product_id = %request.product_id, quantity, "add_to_cart");

    validate_quantity(quantity)?;

    let product = state
        .db
        .products()
        .get(&request.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &request.product_id))?;

    if product.stock_status == StockStatus::OutOfStock {
        return Err(ApiError::validation("Product is out of stock"));
    }

    let view = state
        .sessions
        .with_session_mut(&session_id.0, |session| -> Result<CartView, CoreError> {
            session.cart.add_line(&product, quantity, Utc::now())?;
            session.recalculate(state.config.tax_rate_bps);
            Ok(CartView::from_session(session))
        })?;

    Ok(ApiResponse::data_with_message(view, "Product added to cart"))
}

/// Applies one cart mutation and recomputes the amounts.
fn mutate_cart<F>(state: &AppState, session_id: &str, f: F) -> Result<CartView, ApiError>
where
    F: FnOnce(&mut Session) -> Result<(), CoreError>,
{
    let view = state
        .sessions
        .with_session_mut(session_id, |session| -> Result<CartView, CoreError> {
            f(session)?;
            session.recalculate(state.config.tax_rate_bps);
            Ok(CartView::from_session(session))
        })?;
    Ok(view)
}

/// POST /cart/increase/:product_id
pub async fn increase_quantity(
    session_id: SessionId,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = mutate_cart(&state, &session_id.0, |s| s.cart.increase(&product_id))?;
    Ok(ApiResponse::data(view))
}

/// POST /cart/decrease/:product_id
pub async fn decrease_quantity(
    session_id: SessionId,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = mutate_cart(&state, &session_id.0, |s| s.cart.decrease(&product_id))?;
    Ok(ApiResponse::data(view))
}

/// DELETE /cart/item/:product_id
pub async fn remove_item(
    session_id: SessionId,
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = mutate_cart(&state, &session_id.0, |s| s.cart.remove_line(&product_id))?;
    Ok(ApiResponse::data(view))
}

/// DELETE /cart
pub async fn empty_cart(
    session_id: SessionId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let view = mutate_cart(&state, &session_id.0, |s| {
        s.cart.clear();
        Ok(())
    })?;
    Ok(ApiResponse::data_with_message(view, "Cart emptied"))
}

// =============================================================================
// Coupon Apply / Remove
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub coupon_code: String,
}

enum ApplyOutcome {
    Applied,
    AlreadyApplied,
}

/// POST /cart/apply-coupon
///
/// Outcomes: invalid/expired (404), below cart minimum (422), already
/// applied (informational success, no state change), applied.
pub async fn apply_coupon(
    session_id: SessionId,
    State(state): State<AppState>,
    Json(request): Json<ApplyCouponRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_coupon_code(&request.coupon_code)?;
    let code = request.coupon_code.trim();

    let today = Utc::now().date_naive();
    let coupon = state
        .db
        .coupons()
        .find_active(code, today)
        .await?
        .ok_or(CoreError::CouponNotFound { code: code.to_string() })?;

    let outcome = state
        .sessions
        .with_session_mut(&session_id.0, |session| -> Result<ApplyOutcome, CoreError> {
            let subtotal = Money::from_cents(session.cart.subtotal_cents());
            if subtotal < Money::from_cents(coupon.cart_value_cents) {
                return Err(CoreError::CouponBelowMinimum {
                    required_cents: coupon.cart_value_cents,
                });
            }

            // Idempotent re-apply: report it, change nothing.
            if session
                .coupon
                .as_ref()
                .is_some_and(|applied| applied.code == coupon.code)
            {
                return Ok(ApplyOutcome::AlreadyApplied);
            }

            session.coupon = Some(AppliedCoupon::from_coupon(&coupon, Utc::now()));
            session.recalculate(state.config.tax_rate_bps);
            Ok(ApplyOutcome::Applied)
        })?;

    match outcome {
        ApplyOutcome::AlreadyApplied => {
            Ok(ApiResponse::message("This coupon is already applied"))
        }
        ApplyOutcome::Applied => {
            info!(code = %coupon.code, "Coupon applied");
            Ok(ApiResponse::message("Coupon applied successfully"))
        }
    }
}

/// DELETE /cart/coupon
///
/// Re-validates that the coupon row still exists: an admin may have
/// deleted it since apply. In that case the stale session snapshot is
/// cleared and the failure is reported.
pub async fn remove_coupon(
    session_id: SessionId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let applied = state
        .sessions
        .with_session(&session_id.0, |session| session.coupon.clone())
        .ok_or(CoreError::NoCouponApplied)?;

    let vanished = state.db.coupons().get(&applied.id).await?.is_none();

    state.sessions.with_session_mut(&session_id.0, |session| {
        session.coupon = None;
        session.recalculate(state.config.tax_rate_bps);
    });

    if vanished {
        return Err(CoreError::CouponVanished { code: applied.code }.into());
    }

    info!(code = %applied.code, "Coupon removed");
    Ok(ApiResponse::message("Coupon removed successfully"))
}
