//! # Domain Types
//!
//! Core domain types for the storefront and back-office.
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key where one exists (brand/category/product `slug`,
//!   coupon `code`) - human-readable and unique
//!
//! ## Snapshot Pattern
//! [`Order`] and [`OrderItem`] copy their monetary amounts and shipping
//! address fields at purchase time. Later edits to products, coupons or the
//! customer's address must never change a placed order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Separator used when joining product gallery image filenames into the
/// single `images` column. `","` is canonical for both create and update;
/// reads trim around it so legacy `", "`-joined rows still split cleanly.
pub const GALLERY_SEPARATOR: &str = ",";

// =============================================================================
// Catalog: Brand & Category
// =============================================================================

/// A product brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Brand {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug - unique business key.
    pub slug: String,
    /// Stored image filename (thumbnail generation is handled upstream).
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    /// URL slug - unique business key.
    pub slug: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Catalog: Product
// =============================================================================

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

impl StockStatus {
    /// Parses the wire/database representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "instock" => Some(StockStatus::InStock),
            "outofstock" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }
}

/// A product available in the shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    /// URL slug - unique business key.
    pub slug: String,
    pub short_description: String,
    pub description: String,
    /// List price in cents.
    pub regular_price_cents: i64,
    /// Current selling price in cents. This is the price frozen into cart
    /// lines and order items.
    pub sale_price_cents: i64,
    pub sku: String,
    pub stock_status: StockStatus,
    pub featured: bool,
    /// On-hand quantity (informational; the shop does not reserve stock).
    pub quantity: i64,
    /// Main image filename.
    pub image: Option<String>,
    /// Gallery image filenames joined with [`GALLERY_SEPARATOR`].
    pub images: Option<String>,
    pub category_id: String,
    pub brand_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the selling price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Splits the stored gallery column back into individual filenames.
    pub fn gallery(&self) -> Vec<&str> {
        self.images
            .as_deref()
            .map(|joined| {
                joined
                    .split(GALLERY_SEPARATOR)
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Joins gallery filenames into the stored column form.
pub fn join_gallery(names: &[String]) -> String {
    names.join(GALLERY_SEPARATOR)
}

// =============================================================================
// Coupon
// =============================================================================

/// How a coupon's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    /// `value` is an absolute amount in cents.
    Fixed,
    /// `value` is a percentage in basis points (1000 = 10%).
    Percent,
}

impl CouponKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fixed" => Some(CouponKind::Fixed),
            "percent" => Some(CouponKind::Percent),
            _ => None,
        }
    }
}

/// A discount coupon.
///
/// A coupon is active iff `expiry_date >= today`. The row is only ever
/// mutated through admin edits; applying a coupon to a cart copies it into
/// an [`crate::pricing::AppliedCoupon`] session snapshot instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: String,
    /// Unique redemption code.
    pub code: String,
    pub kind: CouponKind,
    /// Cents for `fixed`, basis points for `percent`.
    pub value: i64,
    /// Minimum cart subtotal (cents) required to redeem.
    pub cart_value_cents: i64,
    /// Last day the coupon can be applied (inclusive).
    pub expiry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Checks whether the coupon can still be applied on `today`.
    #[inline]
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.expiry_date >= today
    }
}

// =============================================================================
// Address
// =============================================================================

/// A customer shipping address.
///
/// At most one address per user carries `is_default = true`; checkout uses
/// the default address and copies its fields into the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Address {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// 10-digit phone number.
    pub phone: String,
    pub locality: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub landmark: String,
    /// 6-digit postal code.
    pub zip: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// Lifecycle status of an order. Closed set - anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// Parses the wire representation, rejecting anything outside the set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "canceled" => Some(OrderStatus::Canceled),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// A placed order.
///
/// Immutable once created except for `status`, `delivered_date` and
/// `canceled_date`. Amounts and shipping fields are frozen copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    /// Shipping fields copied verbatim from the resolved address.
    pub name: String,
    pub phone: String,
    pub locality: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub landmark: String,
    pub zip: String,
    pub status: OrderStatus,
    pub delivered_date: Option<DateTime<Utc>>,
    pub canceled_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A frozen order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Unit price in cents at the time of purchase.
    pub price_cents: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Transaction
// =============================================================================

/// Payment method chosen at checkout. Closed set parsed from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Cash on delivery.
    Cod,
    Card,
    Paypal,
}

impl PaymentMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cod" => Some(PaymentMode::Cod),
            "card" => Some(PaymentMode::Card),
            "paypal" => Some(PaymentMode::Paypal),
            _ => None,
        }
    }
}

/// Settlement status of an order's payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    /// Set automatically when the owning order is marked delivered.
    Approved,
    Declined,
    Refunded,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

/// The payment record attached one-to-one to an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub order_id: String,
    pub mode: PaymentMode,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_parse_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Canceled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("returned"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn test_coupon_active_window() {
        let coupon = Coupon {
            id: "c1".to_string(),
            code: "SAVE10".to_string(),
            kind: CouponKind::Percent,
            value: 1000,
            cart_value_cents: 10_000,
            expiry_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let before = NaiveDate::from_ymd_opt(2026, 3, 30).unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();

        assert!(coupon.is_active(before));
        assert!(coupon.is_active(on));
        assert!(!coupon.is_active(after));
    }

    #[test]
    fn test_gallery_join_and_split() {
        let names = vec!["a.png".to_string(), "b.jpg".to_string()];
        let joined = join_gallery(&names);
        assert_eq!(joined, "a.png,b.jpg");

        let product = Product {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            slug: "widget".to_string(),
            short_description: "w".to_string(),
            description: "w".to_string(),
            regular_price_cents: 1000,
            sale_price_cents: 900,
            sku: "W-1".to_string(),
            stock_status: StockStatus::InStock,
            featured: false,
            quantity: 5,
            image: None,
            images: Some(joined),
            category_id: "c".to_string(),
            brand_id: "b".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(product.gallery(), vec!["a.png", "b.jpg"]);

        // Legacy rows may contain a space after the comma; trim on read.
        let mut legacy = product.clone();
        legacy.images = Some("a.png, b.jpg".to_string());
        assert_eq!(legacy.gallery(), vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_payment_mode_parse() {
        assert_eq!(PaymentMode::parse("cod"), Some(PaymentMode::Cod));
        assert_eq!(PaymentMode::parse("card"), Some(PaymentMode::Card));
        assert_eq!(PaymentMode::parse("wire"), None);
    }
}
