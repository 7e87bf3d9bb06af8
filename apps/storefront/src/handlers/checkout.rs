//! # Checkout Handlers
//!
//! The order assembly flow: resolve a shipping address, freeze the price
//! snapshot, persist Order + OrderItems + Transaction as one unit, then
//! clear the session's cart and coupon state.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use aisle_core::validation::{validate_address_form, AddressForm};
use aisle_core::{
    Address, CartLine, CoreError, Order, OrderItem, OrderStatus, PaymentMode, Transaction,
    TransactionStatus, ValidationError,
};
use aisle_db::repository::address::generate_address_id;
use aisle_db::repository::order::{
    generate_order_id, generate_order_item_id, generate_transaction_id,
};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::session::SessionId;
use crate::state::AppState;

// =============================================================================
// Checkout Page
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CheckoutView {
    /// The default shipping address, if the user has one. Absent means the
    /// place-order request must carry an address form.
    pub address: Option<Address>,
}

/// GET /cart/checkout
pub async fn checkout(
    user: CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let address = state.db.addresses().default_for_user(&user.id).await?;
    Ok(ApiResponse::data(CheckoutView { address }))
}

// =============================================================================
// Place Order
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    /// Payment method: cod | card | paypal.
    pub mode: String,
    /// Shipping address form, required when the user has no default
    /// address yet; persisted as the new default.
    #[serde(default)]
    pub address: Option<AddressForm>,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order_id: String,
}

/// POST /cart/place-order
///
/// Steps, in order:
/// 1. resolve the shipping address (existing default, or validate and
///    persist the form input as the new default)
/// 2. freeze the price snapshot; an empty cart is a conflict
/// 3. persist the order, its items and the pending transaction in one
///    database transaction
/// 4. clear the session and record the order id for confirmation
pub async fn place_order(
    session_id: SessionId,
    user: CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(user_id = %user.id, mode = %request.mode, "place_order");

    let mode = PaymentMode::parse(&request.mode).ok_or_else(|| {
        ApiError::validation_fields(vec![ValidationError::InvalidFormat {
            field: "mode".to_string(),
            reason: "must be one of: cod, card, paypal".to_string(),
        }])
    })?;

    // 1. Resolve the shipping address.
    let address = match state.db.addresses().default_for_user(&user.id).await? {
        Some(address) => address,
        None => {
            let form = request
                .address
                .ok_or_else(|| ApiError::validation("Shipping address is required"))?;
            validate_address_form(&form).map_err(ApiError::validation_fields)?;

            let now = Utc::now();
            let address = Address {
                id: generate_address_id(),
                user_id: user.id.clone(),
                name: form.name.trim().to_string(),
                phone: form.phone.trim().to_string(),
                locality: form.locality.trim().to_string(),
                address: form.address.trim().to_string(),
                city: form.city.trim().to_string(),
                state: form.state.trim().to_string(),
                landmark: form.landmark.trim().to_string(),
                zip: form.zip.trim().to_string(),
                country: String::new(),
                is_default: true,
                created_at: now,
                updated_at: now,
            };
            state.db.addresses().insert(&address).await?;
            address
        }
    };

    // 2. Freeze the price snapshot; bail out on an empty cart.
    let (snapshot, lines): (_, Vec<CartLine>) =
        state.sessions.with_session_mut(&session_id.0, |session| {
            (
                session.freeze_checkout(state.config.tax_rate_bps),
                session.cart.lines.clone(),
            )
        });
    let snapshot = snapshot.ok_or(CoreError::EmptyCart)?;

    // 3. Assemble the frozen records.
    let now = Utc::now();
    let order = Order {
        id: generate_order_id(),
        user_id: user.id.clone(),
        subtotal_cents: snapshot.subtotal_cents,
        discount_cents: snapshot.discount_cents,
        tax_cents: snapshot.tax_cents,
        total_cents: snapshot.total_cents,
        name: address.name.clone(),
        phone: address.phone.clone(),
        locality: address.locality.clone(),
        address: address.address.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        country: address.country.clone(),
        landmark: address.landmark.clone(),
        zip: address.zip.clone(),
        status: OrderStatus::Pending,
        delivered_date: None,
        canceled_date: None,
        created_at: now,
        updated_at: now,
    };

    let items: Vec<OrderItem> = lines
        .iter()
        .map(|line| OrderItem {
            id: generate_order_item_id(),
            order_id: order.id.clone(),
            product_id: line.product_id.clone(),
            price_cents: line.unit_price_cents,
            quantity: line.quantity,
            created_at: now,
        })
        .collect();

    let transaction = Transaction {
        id: generate_transaction_id(),
        user_id: user.id.clone(),
        order_id: order.id.clone(),
        mode,
        status: TransactionStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    // All three groups commit together or not at all; a partial order must
    // never become visible, so any storage failure surfaces as one
    // checkout failure.
    state
        .db
        .orders()
        .place_order(&order, &items, &transaction)
        .await
        .map_err(|e| {
            error!(order_id = %order.id, error = %e, "Order placement failed");
            ApiError::integrity("Order could not be placed")
        })?;

    // 4. Clear session state and remember the order for confirmation.
    state.sessions.with_session_mut(&session_id.0, |session| {
        session.clear_after_checkout();
        session.order_id = Some(order.id.clone());
    });

    info!(order_id = %order.id, user_id = %user.id, total = order.total_cents, "Order placed");

    Ok(ApiResponse::data_with_message(
        PlaceOrderResponse { order_id: order.id },
        "Order placed successfully",
    )
    .created())
}

// =============================================================================
// Confirmation
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub transaction: Option<Transaction>,
}

/// GET /cart/confirmation
///
/// Shows the session's last placed order.
pub async fn confirmation(
    session_id: SessionId,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let order_id = state
        .sessions
        .with_session(&session_id.0, |session| session.order_id.clone())
        .ok_or_else(|| ApiError::not_found("Order", "no recent order"))?;

    let order = state
        .db
        .orders()
        .get(&order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &order_id))?;
    let items = state.db.orders().items_for_order(&order_id).await?;
    let transaction = state.db.orders().transaction_for_order(&order_id).await?;

    Ok(ApiResponse::data(ConfirmationView {
        order,
        items,
        transaction,
    }))
}
