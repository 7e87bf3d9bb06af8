//! # Session State
//!
//! Per-session cart, coupon and checkout state.
//!
//! Each browsing session (identified by the opaque `X-Session-Id` header)
//! owns exactly one [`Session`]. Sessions never share state, so a single
//! mutex around the map is enough; every handler takes the lock, runs its
//! closure and releases it.
//!
//! Session keys and their lifetimes:
//! - `cart` - lines with frozen prices; destroyed on checkout or empty
//! - `coupon` - the applied-coupon snapshot, at most one
//! - `discounts` - price snapshot recomputed on every cart/coupon change
//! - `checkout` - the frozen snapshot checkout reads; absent means
//!   checkout must not proceed
//! - `order_id` - last placed order, for the confirmation view

use std::collections::HashMap;
use std::sync::Mutex;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use aisle_core::{price_cart, AppliedCoupon, Cart, PriceSnapshot};

use crate::error::ApiError;

// =============================================================================
// Session
// =============================================================================

/// State owned by one browsing session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub cart: Cart,
    pub coupon: Option<AppliedCoupon>,
    pub discounts: Option<PriceSnapshot>,
    pub checkout: Option<PriceSnapshot>,
    pub order_id: Option<String>,
}

impl Session {
    /// Recomputes the discount snapshot after any cart or coupon change.
    ///
    /// An empty cart clears the snapshot entirely rather than storing
    /// zeros - checkout keys must be absent, not zeroed.
    pub fn recalculate(&mut self, tax_rate_bps: u32) {
        self.discounts = price_cart(&self.cart, self.coupon.as_ref(), tax_rate_bps);
    }

    /// Freezes the checkout amounts from the current cart state.
    ///
    /// With a coupon applied the discount snapshot is reused; otherwise
    /// the raw cart totals are priced without a discount. Returns the
    /// frozen snapshot, or `None` for an empty cart (and clears the
    /// checkout key as a side effect).
    pub fn freeze_checkout(&mut self, tax_rate_bps: u32) -> Option<PriceSnapshot> {
        if self.cart.is_empty() {
            self.checkout = None;
            return None;
        }

        let snapshot = if self.coupon.is_some() {
            self.discounts
                .or_else(|| price_cart(&self.cart, self.coupon.as_ref(), tax_rate_bps))
        } else {
            price_cart(&self.cart, None, tax_rate_bps)
        };

        self.checkout = snapshot;
        snapshot
    }

    /// Clears everything checkout consumed: cart lines, coupon, discount
    /// and checkout snapshots. `order_id` is set by the caller afterwards.
    pub fn clear_after_checkout(&mut self) {
        self.cart.clear();
        self.coupon = None;
        self.discounts = None;
        self.checkout = None;
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// Process-wide map of session id to [`Session`].
///
/// Sessions are created lazily on first touch and live for the process
/// lifetime (TTL = session lifetime; an upstream gateway rotates ids).
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Runs a closure with read access to a session.
    pub fn with_session<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        let session = sessions.entry(session_id.to_string()).or_default();
        f(session)
    }

    /// Runs a closure with write access to a session.
    pub fn with_session_mut<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.lock().expect("session mutex poisoned");
        let session = sessions.entry(session_id.to_string()).or_default();
        f(session)
    }
}

// =============================================================================
// Session Id Extractor
// =============================================================================

/// The caller's session id, taken from the `X-Session-Id` header.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get("x-session-id")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::validation("X-Session-Id header is required"))?;

        Ok(SessionId(value.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_core::types::{Product, StockStatus};
    use chrono::Utc;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            short_description: "s".to_string(),
            description: "d".to_string(),
            regular_price_cents: price,
            sale_price_cents: price,
            sku: format!("SKU-{}", id),
            stock_status: StockStatus::InStock,
            featured: false,
            quantity: 5,
            image: None,
            images: None,
            category_id: "c".to_string(),
            brand_id: "b".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();

        store.with_session_mut("alpha", |s| {
            s.cart.add_line(&product("1", 1000), 1, Utc::now()).unwrap();
        });

        assert_eq!(store.with_session("alpha", |s| s.cart.line_count()), 1);
        assert_eq!(store.with_session("beta", |s| s.cart.line_count()), 0);
    }

    #[test]
    fn test_freeze_checkout_on_empty_cart_clears_key() {
        let store = SessionStore::new();

        let frozen = store.with_session_mut("s", |s| {
            s.checkout = Some(PriceSnapshot {
                subtotal_cents: 1,
                discount_cents: 0,
                tax_cents: 0,
                total_cents: 1,
            });
            s.freeze_checkout(0)
        });

        assert!(frozen.is_none());
        assert!(store.with_session("s", |s| s.checkout.is_none()));
    }

    #[test]
    fn test_freeze_checkout_without_coupon() {
        let store = SessionStore::new();

        let frozen = store.with_session_mut("s", |s| {
            s.cart.add_line(&product("1", 2000), 2, Utc::now()).unwrap();
            s.freeze_checkout(500)
        });

        let snapshot = frozen.unwrap();
        assert_eq!(snapshot.subtotal_cents, 4000);
        assert_eq!(snapshot.discount_cents, 0);
        assert_eq!(snapshot.tax_cents, 200);
        assert_eq!(snapshot.total_cents, 4200);
    }

    #[test]
    fn test_clear_after_checkout() {
        let store = SessionStore::new();

        store.with_session_mut("s", |s| {
            s.cart.add_line(&product("1", 2000), 1, Utc::now()).unwrap();
            s.recalculate(0);
            s.freeze_checkout(0);
            s.clear_after_checkout();
            s.order_id = Some("o1".to_string());
        });

        store.with_session("s", |s| {
            assert!(s.cart.is_empty());
            assert!(s.coupon.is_none());
            assert!(s.discounts.is_none());
            assert!(s.checkout.is_none());
            assert_eq!(s.order_id.as_deref(), Some("o1"));
        });
    }
}
