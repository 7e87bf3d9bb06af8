//! # Error Types
//!
//! Domain-specific error types for aisle-core.
//!
//! Error flow across the workspace:
//! `ValidationError` → `CoreError` → (aisle-db `DbError`) → storefront
//! `ApiError`, which maps onto HTTP status codes.
//!
//! Design rules, shared with the rest of the workspace:
//! 1. `thiserror` derives, never hand-rolled `impl Error`
//! 2. Context in the message (code, field, required amount)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and domain logic failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No coupon with this code is currently active. Covers both unknown
    /// codes and expired coupons; callers cannot distinguish the two.
    #[error("Invalid or expired coupon code: {code}")]
    CouponNotFound { code: String },

    /// The cart subtotal is below the coupon's minimum cart value.
    #[error("Minimum cart value for this coupon is {required_cents}")]
    CouponBelowMinimum { required_cents: i64 },

    /// Removal was requested but the session has no applied coupon.
    #[error("No coupon applied")]
    NoCouponApplied,

    /// The applied coupon was deleted between apply and remove. The stale
    /// session snapshot is cleared as a side effect of detecting this.
    #[error("Coupon {code} no longer exists")]
    CouponVanished { code: String },

    /// Checkout was attempted with no cart lines.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// An order status outside the closed set was supplied.
    #[error("Invalid order status: {given}")]
    InvalidOrderStatus { given: String },

    /// An order marked delivered has no transaction row to approve.
    /// Data-integrity error, never a silent no-op.
    #[error("No transaction found for order {order_id}")]
    TransactionMissing { order_id: String },

    /// A cart line operation referenced a product not in the cart.
    #[error("Product {product_id} is not in the cart")]
    LineNotFound { product_id: String },

    /// Cart has exceeded the maximum number of lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Input validation failure (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Per-field input validation errors.
///
/// Each variant names the offending field so the API layer can report
/// field-level errors back to the caller.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must consist of exactly `digits` decimal digits.
    #[error("{field} must be exactly {digits} digits")]
    DigitsExact { field: String, digits: usize },

    /// Invalid format (bad slug, unknown enum value, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// The name of the field this error is attached to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::DigitsExact { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CouponBelowMinimum { required_cents: 10_000 };
        assert_eq!(err.to_string(), "Minimum cart value for this coupon is 10000");

        let err = CoreError::CouponNotFound {
            code: "SAVE10".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid or expired coupon code: SAVE10");
    }

    #[test]
    fn test_validation_error_field_accessor() {
        let err = ValidationError::DigitsExact {
            field: "phone".to_string(),
            digits: 10,
        };
        assert_eq!(err.field(), "phone");
        assert_eq!(err.to_string(), "phone must be exactly 10 digits");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation = ValidationError::Required {
            field: "name".to_string(),
        };
        let core: CoreError = validation.into();
        assert!(matches!(core, CoreError::Validation(_)));
    }
}
