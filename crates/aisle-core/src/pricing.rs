//! # Pricing
//!
//! Coupon discount math and the checkout price snapshot.
//!
//! The flow on every cart mutation or coupon change:
//!
//! ```text
//! Cart lines ──► subtotal ──► discount (applied coupon) ──► PriceSnapshot
//!                                │                              │
//!                        clamped to subtotal          total = subtotal
//!                                                       - discount + tax
//! ```
//!
//! Tax arrives from the cart subsystem and passes through unmodified.
//! Nothing here mutates a [`Coupon`] row; applying a coupon only copies it
//! into a session-scoped [`AppliedCoupon`] snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::Money;
use crate::types::{Coupon, CouponKind};

// =============================================================================
// Applied Coupon
// =============================================================================

/// Session snapshot of a coupon at the moment it was applied.
///
/// At most one applied coupon exists per session. The snapshot keeps the
/// coupon id so removal can re-check the row still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub id: String,
    pub code: String,
    pub kind: CouponKind,
    /// Cents for `fixed`, basis points for `percent`.
    pub value: i64,
    /// Minimum cart subtotal (cents) the coupon required when applied.
    pub cart_value_cents: i64,
    /// When the coupon was applied to the session.
    pub applied_at: DateTime<Utc>,
}

impl AppliedCoupon {
    /// Snapshots a coupon row for the session.
    pub fn from_coupon(coupon: &Coupon, applied_at: DateTime<Utc>) -> Self {
        AppliedCoupon {
            id: coupon.id.clone(),
            code: coupon.code.clone(),
            kind: coupon.kind,
            value: coupon.value,
            cart_value_cents: coupon.cart_value_cents,
            applied_at,
        }
    }
}

// =============================================================================
// Discount Formula
// =============================================================================

/// Computes the discount a coupon grants on a subtotal.
///
/// - `fixed`: `min(value, subtotal)`
/// - `percent`: `subtotal * value / 10000` (value in basis points),
///   clamped to the subtotal
///
/// The result always satisfies `0 <= discount <= subtotal`.
pub fn discount_cents(kind: CouponKind, value: i64, subtotal: Money) -> Money {
    let raw = match kind {
        CouponKind::Fixed => Money::from_cents(value.max(0)),
        CouponKind::Percent => subtotal.percent_of(value.max(0) as u32),
    };
    raw.min(subtotal)
}

// =============================================================================
// Price Snapshot
// =============================================================================

/// The frozen amounts carried from cart to checkout to order.
///
/// Invariants, enforced by [`PriceSnapshot::new`]:
/// - `discount_cents <= subtotal_cents`
/// - `total_cents = subtotal_cents - discount_cents + tax_cents`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl PriceSnapshot {
    /// Assembles a snapshot, clamping the discount and deriving the total.
    pub fn new(subtotal: Money, discount: Money, tax: Money) -> Self {
        let discount = discount.min(subtotal);
        let total = subtotal - discount + tax;
        PriceSnapshot {
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            tax_cents: tax.cents(),
            total_cents: total.cents(),
        }
    }
}

/// Prices a cart, with or without an applied coupon.
///
/// Returns `None` for an empty cart: the checkout snapshot must be cleared
/// entirely in that case, never stored as zeros, so checkout cannot proceed.
///
/// `tax_rate_bps` is the configured cart tax rate; the resulting tax value
/// is passed through into the snapshot unmodified.
pub fn price_cart(cart: &Cart, applied: Option<&AppliedCoupon>, tax_rate_bps: u32) -> Option<PriceSnapshot> {
    if cart.is_empty() {
        return None;
    }

    let subtotal = Money::from_cents(cart.subtotal_cents());
    let discount = match applied {
        Some(coupon) => discount_cents(coupon.kind, coupon.value, subtotal),
        None => Money::zero(),
    };
    let tax = Money::from_cents(cart.tax_cents(tax_rate_bps));

    Some(PriceSnapshot::new(subtotal, discount, tax))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, StockStatus};
    use chrono::NaiveDate;

    fn product(id: &str, sale_price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            short_description: "short".to_string(),
            description: "long".to_string(),
            regular_price_cents: sale_price_cents,
            sale_price_cents,
            sku: format!("SKU-{}", id),
            stock_status: StockStatus::InStock,
            featured: false,
            quantity: 10,
            image: None,
            images: None,
            category_id: "cat".to_string(),
            brand_id: "brand".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn percent_coupon(value_bps: i64, cart_value_cents: i64) -> Coupon {
        Coupon {
            id: "c1".to_string(),
            code: "SAVE10".to_string(),
            kind: CouponKind::Percent,
            value: value_bps,
            cart_value_cents,
            expiry_date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_fixed_discount_is_min_of_value_and_subtotal() {
        let subtotal = Money::from_cents(8_000);
        assert_eq!(discount_cents(CouponKind::Fixed, 2_000, subtotal).cents(), 2_000);
        // Coupon worth more than the cart: clamp to subtotal.
        assert_eq!(discount_cents(CouponKind::Fixed, 10_000, subtotal).cents(), 8_000);
    }

    #[test]
    fn test_percent_discount() {
        // 10% of 500.00 is 50.00
        let subtotal = Money::from_cents(50_000);
        assert_eq!(discount_cents(CouponKind::Percent, 1_000, subtotal).cents(), 5_000);
        // 100%+ never exceeds the subtotal
        assert_eq!(discount_cents(CouponKind::Percent, 15_000, subtotal).cents(), 50_000);
    }

    #[test]
    fn test_snapshot_total_identity() {
        let snapshot = PriceSnapshot::new(
            Money::from_cents(50_000),
            Money::from_cents(5_000),
            Money::from_cents(2_500),
        );
        assert_eq!(snapshot.subtotal_cents, 50_000);
        assert_eq!(snapshot.discount_cents, 5_000);
        assert_eq!(snapshot.tax_cents, 2_500);
        assert_eq!(
            snapshot.total_cents,
            snapshot.subtotal_cents - snapshot.discount_cents + snapshot.tax_cents
        );
    }

    #[test]
    fn test_snapshot_clamps_discount() {
        let snapshot = PriceSnapshot::new(
            Money::from_cents(1_000),
            Money::from_cents(2_500),
            Money::zero(),
        );
        assert_eq!(snapshot.discount_cents, 1_000);
        assert_eq!(snapshot.total_cents, 0);
    }

    #[test]
    fn test_price_cart_without_coupon() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 50_000), 1, Utc::now()).unwrap();

        let snapshot = price_cart(&cart, None, 0).unwrap();
        assert_eq!(snapshot.subtotal_cents, 50_000);
        assert_eq!(snapshot.discount_cents, 0);
        assert_eq!(snapshot.total_cents, 50_000);
    }

    #[test]
    fn test_price_cart_with_percent_coupon() {
        // 500.00 cart, 10% coupon with a 100.00 minimum: 50.00 off.
        let mut cart = Cart::new();
        cart.add_line(&product("1", 25_000), 2, Utc::now()).unwrap();

        let coupon = percent_coupon(1_000, 10_000);
        let applied = AppliedCoupon::from_coupon(&coupon, Utc::now());

        let snapshot = price_cart(&cart, Some(&applied), 500).unwrap();
        assert_eq!(snapshot.subtotal_cents, 50_000);
        assert_eq!(snapshot.discount_cents, 5_000);
        // 5% tax on the subtotal, passed through as-is.
        assert_eq!(snapshot.tax_cents, 2_500);
        assert_eq!(snapshot.total_cents, 47_500);
    }

    #[test]
    fn test_price_cart_empty_is_none() {
        assert!(price_cart(&Cart::new(), None, 500).is_none());
    }

    #[test]
    fn test_applied_coupon_snapshots_row() {
        let coupon = percent_coupon(1_000, 10_000);
        let now = Utc::now();
        let applied = AppliedCoupon::from_coupon(&coupon, now);

        assert_eq!(applied.id, coupon.id);
        assert_eq!(applied.code, coupon.code);
        assert_eq!(applied.value, coupon.value);
        assert_eq!(applied.cart_value_cents, coupon.cart_value_cents);
        assert_eq!(applied.applied_at, now);
    }
}
