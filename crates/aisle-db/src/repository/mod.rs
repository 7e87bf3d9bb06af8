//! # Repositories
//!
//! One repository per aggregate. Each wraps the shared pool and exposes
//! typed async operations; all SQL lives here and nowhere else.

use serde::Serialize;

pub mod address;
pub mod brand;
pub mod category;
pub mod coupon;
pub mod order;
pub mod product;

// =============================================================================
// Pagination
// =============================================================================

/// One page of a listing plus the metadata the API reports.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

impl<T> Page<T> {
    /// Builds a page, deriving `last_page` from the total row count.
    /// An empty table still reports one (empty) page.
    pub fn new(items: Vec<T>, total: i64, current_page: u32, per_page: u32) -> Self {
        let last_page = if total <= 0 {
            1
        } else {
            ((total as u64 + per_page as u64 - 1) / per_page as u64) as u32
        };
        Page {
            items,
            total,
            current_page,
            per_page,
            last_page,
        }
    }
}

/// Normalizes page/per_page query input and converts to LIMIT/OFFSET.
///
/// Page numbers are 1-based; `per_page` is capped at 100.
pub(crate) fn page_bounds(page: u32, per_page: u32) -> (u32, u32, i64, i64) {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);
    let limit = per_page as i64;
    let offset = (page as i64 - 1) * limit;
    (page, per_page, limit, offset)
}
