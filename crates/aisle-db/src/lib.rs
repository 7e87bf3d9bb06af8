//! # aisle-db: Database Layer for the Aisle Storefront
//!
//! SQLite storage for the catalog and order data, built on sqlx.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per aggregate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aisle_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("aisle.db")).await?;
//! let page = db.products().list(ProductSort::Default, 1, 12).await?;
//! ```
//!
//! Order placement is the one multi-statement write in the system; see
//! [`repository::order::OrderRepository::place_order`] for the
//! all-or-nothing transaction.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::Page;

pub use repository::address::AddressRepository;
pub use repository::brand::BrandRepository;
pub use repository::category::CategoryRepository;
pub use repository::coupon::CouponRepository;
pub use repository::order::OrderRepository;
pub use repository::product::{ProductRepository, ProductSort};
