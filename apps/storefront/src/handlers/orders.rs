//! # Order Handlers (admin)
//!
//! Listing, detail and the status update with its transaction cascade.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use aisle_core::{CoreError, Order, OrderItem, OrderStatus, Transaction};
use aisle_db::DbError;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::handlers::ListQuery;
use crate::response::{paginated, ApiResponse};
use crate::state::AppState;

/// GET /orders
pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .db
        .orders()
        .list(query.page(), query.per_page(12))
        .await?;
    Ok(paginated(page))
}

#[derive(Debug, Serialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub transaction: Option<Transaction>,
}

/// GET /orders/:id/items
pub async fn show_items(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .db
        .orders()
        .get(&order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &order_id))?;
    let items = state.db.orders().items_for_order(&order_id).await?;
    let transaction = state.db.orders().transaction_for_order(&order_id).await?;

    Ok(ApiResponse::data(OrderDetails {
        order,
        items,
        transaction,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub order_status: String,
}

/// PUT /orders/:id/status
///
/// The status set is closed. `delivered` stamps the delivery date and
/// approves the order's transaction; a missing transaction is reported as
/// a data-integrity failure, not swallowed. `canceled` stamps the
/// cancellation date and leaves the transaction alone.
pub async fn update_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    debug!(order_id = %order_id, status = %request.order_status, "update_status");

    let status = OrderStatus::parse(&request.order_status).ok_or(CoreError::InvalidOrderStatus {
        given: request.order_status.clone(),
    })?;

    state
        .db
        .orders()
        .update_status(&order_id, status, Utc::now())
        .await
        .map_err(|e| match e {
            DbError::NotFound { ref entity, .. } if entity == "Transaction" => {
                CoreError::TransactionMissing {
                    order_id: order_id.clone(),
                }
                .into()
            }
            other => ApiError::from(other),
        })?;

    let order = state
        .db
        .orders()
        .get(&order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &order_id))?;

    Ok(ApiResponse::data_with_message(order, "Order status updated successfully"))
}
