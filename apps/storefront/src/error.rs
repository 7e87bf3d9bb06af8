//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! Every failure path funnels into [`ApiError`], which pairs a
//! machine-readable [`ErrorCode`] (and therefore an HTTP status) with a
//! human-readable message, plus optional per-field validation details:
//!
//! ```json
//! { "success": false, "message": "...", "errors": { "phone": ["..."] } }
//! ```

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use aisle_core::{CoreError, ValidationError};
use aisle_db::DbError;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable error message for display.
    pub message: String,

    /// Per-field validation messages, present for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Error codes, each mapped onto one HTTP status.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404).
    NotFound,

    /// Input validation failed (422).
    ValidationError,

    /// The operation conflicts with current session state: nothing to
    /// remove, empty cart at checkout (409).
    StateConflict,

    /// Caller is not authenticated (401).
    Unauthorized,

    /// Caller is authenticated but not allowed (403).
    Forbidden,

    /// Cross-record consistency was violated: partial order placement,
    /// vanished coupon, missing transaction (500).
    Integrity,

    /// Database operation failed (500).
    DatabaseError,

    /// Internal server error (500).
    Internal,
}

impl ErrorCode {
    const fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::StateConflict => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Integrity | ErrorCode::DatabaseError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            errors: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error with a single message.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a validation error carrying per-field messages.
    pub fn validation_fields(errors: Vec<ValidationError>) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &errors {
            fields
                .entry(error.field().to_string())
                .or_default()
                .push(error.to_string());
        }
        ApiError {
            code: ErrorCode::ValidationError,
            message: "The given data was invalid".to_string(),
            errors: Some(fields),
        }
    }

    /// Creates a session-state conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StateConflict, message)
    }

    /// Creates an unauthenticated error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates a data-integrity error.
    pub fn integrity(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Integrity, message)
    }

    /// The HTTP status this error renders as.
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Renders the error as the standard failure envelope.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct Body {
            success: bool,
            message: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            errors: Option<BTreeMap<String, Vec<String>>>,
        }

        let status = self.status();
        let body = Body {
            success: false,
            message: self.message,
            errors: self.errors,
        };
        (status, Json(body)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field } => {
                ApiError::validation(format!("{} already exists", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the detail, return a generic message.
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CouponNotFound { .. } => {
                ApiError::new(ErrorCode::NotFound, "Invalid or expired coupon code")
            }
            CoreError::CouponBelowMinimum { required_cents } => ApiError::validation(format!(
                "Minimum cart value for this coupon is {} cents",
                required_cents
            )),
            CoreError::NoCouponApplied => ApiError::conflict("No coupon applied"),
            CoreError::CouponVanished { code } => {
                ApiError::integrity(format!("Coupon {} no longer exists", code))
            }
            CoreError::EmptyCart => ApiError::conflict("Cannot check out an empty cart"),
            CoreError::InvalidOrderStatus { given } => {
                ApiError::validation(format!("Invalid order status: {}", given))
            }
            CoreError::TransactionMissing { order_id } => {
                ApiError::integrity(format!("No transaction found for order {}", order_id))
            }
            CoreError::LineNotFound { product_id } => {
                ApiError::not_found("Cart line", &product_id)
            }
            CoreError::CartTooLarge { .. } | CoreError::QuantityTooLarge { .. } => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation_fields(vec![e]),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation_fields(vec![err])
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::not_found("Order", "x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation("bad").status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::conflict("empty").status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::unauthorized("login").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("admins only").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::integrity("partial").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_fields_grouped_by_field() {
        let err = ApiError::validation_fields(vec![
            ValidationError::Required { field: "name".to_string() },
            ValidationError::DigitsExact { field: "phone".to_string(), digits: 10 },
        ]);

        let fields = err.errors.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"], vec!["name is required"]);
        assert_eq!(fields["phone"], vec!["phone must be exactly 10 digits"]);
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::EmptyCart.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = CoreError::CouponNotFound { code: "X".to_string() }.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CoreError::TransactionMissing { order_id: "o".to_string() }.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
