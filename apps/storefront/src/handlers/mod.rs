//! # Handlers
//!
//! One module per resource. Handlers validate input, call core functions
//! and repositories, and shape the response envelope - no business rules
//! of their own.

use serde::Deserialize;

pub mod brands;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod coupons;
pub mod orders;
pub mod products;

/// Common listing query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Storefront product sort order: default | date | price | price-desc.
    pub sorting: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn per_page(&self, default: u32) -> u32 {
        self.per_page.unwrap_or(default)
    }
}
