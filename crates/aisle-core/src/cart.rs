//! # Shopping Cart
//!
//! Session-scoped cart with frozen line prices.
//!
//! A cart line copies the product's name and selling price at the moment it
//! is added. If an admin edits the product afterwards, the cart (and any
//! order later assembled from it) keeps showing what the customer agreed to.
//!
//! The cart also owns tax: [`Cart::tax_cents`] applies the configured rate
//! to the subtotal. Pricing treats that value as opaque input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One product line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID) for database lookup at checkout.
    pub product_id: String,

    /// Product name at the time of adding (frozen).
    pub name: String,

    /// Unit price in cents at the time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in the cart, always positive.
    pub quantity: i64,

    /// When this line was added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a line from a product, freezing its name and sale price.
    pub fn from_product(product: &Product, quantity: i64, now: DateTime<Utc>) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.sale_price_cents,
            quantity,
            added_at: now,
        }
    }

    /// Line total before tax (unit price x quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product again merges
///   into the existing line)
/// - `quantity > 0` on every line (dropping to zero removes the line)
/// - At most [`MAX_CART_LINES`] lines, each at most [`MAX_LINE_QUANTITY`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart, merging quantity if already present.
    pub fn add_line(&mut self, product: &Product, quantity: i64, now: DateTime<Utc>) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(CoreError::Validation(
                crate::error::ValidationError::MustBePositive {
                    field: "quantity".to_string(),
                },
            ));
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge { max: MAX_CART_LINES });
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity, now));
        Ok(())
    }

    /// Sets the quantity of a line. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_line(product_id);
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound {
                product_id: product_id.to_string(),
            }),
        }
    }

    /// Increases a line's quantity by one.
    pub fn increase(&mut self, product_id: &str) -> CoreResult<()> {
        let current = self.quantity_of(product_id)?;
        self.update_quantity(product_id, current + 1)
    }

    /// Decreases a line's quantity by one; the line is removed at zero.
    pub fn decrease(&mut self, product_id: &str) -> CoreResult<()> {
        let current = self.quantity_of(product_id)?;
        self.update_quantity(product_id, current - 1)
    }

    fn quantity_of(&self, product_id: &str) -> CoreResult<i64> {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .ok_or_else(|| CoreError::LineNotFound {
                product_id: product_id.to_string(),
            })
    }

    /// Removes a line by product ID.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == before {
            Err(CoreError::LineNotFound {
                product_id: product_id.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal before discount and tax; zero for an empty cart.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Tax on the subtotal at the given rate.
    pub fn tax_cents(&self, rate_bps: u32) -> i64 {
        Money::from_cents(self.subtotal_cents()).percent_of(rate_bps).cents()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StockStatus;

    fn test_product(id: &str, sale_price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            slug: format!("product-{}", id),
            short_description: "short".to_string(),
            description: "long".to_string(),
            regular_price_cents: sale_price_cents + 100,
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

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 999), 2, Utc::now()).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal_cents(), 1998);
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut cart = Cart::new();
        let product = test_product("1", 999);

        cart.add_line(&product, 2, Utc::now()).unwrap();
        cart.add_line(&product, 3, Utc::now()).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 999);
        cart.add_line(&product, 1, Utc::now()).unwrap();

        product.sale_price_cents = 1299;
        assert_eq!(cart.subtotal_cents(), 999);
    }

    #[test]
    fn test_decrease_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 500), 1, Utc::now()).unwrap();

        cart.decrease("1").unwrap();
        assert!(cart.is_empty());
        assert!(matches!(cart.decrease("1"), Err(CoreError::LineNotFound { .. })));
    }

    #[test]
    fn test_update_quantity_bounds() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 500), 1, Utc::now()).unwrap();

        assert!(matches!(
            cart.update_quantity("1", MAX_LINE_QUANTITY + 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        cart.update_quantity("1", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_tax_from_configured_rate() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("1", 1000), 1, Utc::now()).unwrap();

        // 10.00 at 8.25% rounds to 0.83
        assert_eq!(cart.tax_cents(825), 83);
        assert_eq!(cart.tax_cents(0), 0);
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        assert_eq!(Cart::new().subtotal_cents(), 0);
    }
}
