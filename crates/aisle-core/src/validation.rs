//! # Validation Module
//!
//! Field-level input validation. These checks run at the application
//! boundary before any business logic; database constraints (NOT NULL,
//! UNIQUE) remain the last line of defense.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required display name (non-empty, at most 100 characters).
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field: field.to_string() });
    }
    if value.len() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a required free-text field (non-empty only).
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field: field.to_string() });
    }
    Ok(())
}

/// Validates a URL slug.
///
/// Rules: non-empty, at most 100 characters, lowercase alphanumeric with
/// hyphens only.
pub fn validate_slug(value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field: "slug".to_string() });
    }
    if value.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "slug".to_string(),
            max: 100,
        });
    }
    if !value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must contain only lowercase letters, digits and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Turns an arbitrary name into a slug: lowercased, non-alphanumerics
/// collapsed into single hyphens.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_hyphen = true;

    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Validates a coupon code (non-empty, at most 50 characters).
pub fn validate_coupon_code(value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field: "coupon_code".to_string() });
    }
    if value.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "coupon_code".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a field made of exactly `digits` decimal digits
/// (phone numbers, postal codes).
pub fn validate_digits(field: &str, value: &str, digits: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required { field: field.to_string() });
    }
    if value.len() != digits || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::DigitsExact {
            field: field.to_string(),
            digits,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents (non-negative; zero allows free items).
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a line quantity (positive, bounded).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity".to_string() });
    }
    if qty > crate::MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: crate::MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Address Form
// =============================================================================

/// Raw shipping-address form input, validated before persisting a new
/// default address at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressForm {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub locality: String,
    pub landmark: String,
}

/// Validates every address field, collecting all failures so the caller
/// can report them per-field in one response.
pub fn validate_address_form(form: &AddressForm) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_name("name", &form.name) {
        errors.push(e);
    }
    if let Err(e) = validate_digits("phone", &form.phone, 10) {
        errors.push(e);
    }
    if let Err(e) = validate_digits("zip", &form.zip, 6) {
        errors.push(e);
    }
    for (field, value) in [
        ("state", &form.state),
        ("city", &form.city),
        ("address", &form.address),
        ("locality", &form.locality),
        ("landmark", &form.landmark),
    ] {
        if let Err(e) = validate_required(field, value) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
