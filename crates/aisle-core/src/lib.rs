//! # aisle-core: Pure Business Logic for the Aisle Storefront
//!
//! This crate is the heart of the storefront. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Brand, Category, Product, Coupon, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point)
//! - [`cart`] - Session-scoped shopping cart with frozen line prices
//! - [`pricing`] - Coupon discounts and the checkout price snapshot
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level input validation
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output - no hidden state
//! 2. **No I/O**: database, network and file system access live elsewhere
//! 3. **Integer money**: all monetary values are cents (i64), percentages
//!    are basis points (u32)
//! 4. **Explicit errors**: typed error enums, never strings or panics
//!
//! ## Example
//!
//! ```rust
//! use aisle_core::money::Money;
//! use aisle_core::pricing::discount_cents;
//! use aisle_core::types::CouponKind;
//!
//! // A 10% coupon (1000 basis points) on a 500.00 subtotal
//! let subtotal = Money::from_cents(50_000);
//! let discount = discount_cents(CouponKind::Percent, 1_000, subtotal);
//! assert_eq!(discount.cents(), 5_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{discount_cents, price_cart, AppliedCoupon, PriceSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps checkout payloads bounded.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// Guards against accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
