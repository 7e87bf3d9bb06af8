//! # aisle-storefront
//!
//! HTTP storefront and admin back-office for the Aisle shop.
//!
//! Request flow:
//!
//! ```text
//! axum route ──► handler ──► aisle-core (validate, price)
//!                   │
//!                   ├──► SessionStore (cart / coupon / checkout state)
//!                   └──► aisle-db repositories
//! ```
//!
//! Handlers return `Result<_, ApiError>`; [`error::ApiError`] carries the
//! HTTP status and the `{success: false, message, errors?}` body shape.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;

pub use config::StorefrontConfig;
pub use routes::router;
pub use state::AppState;
