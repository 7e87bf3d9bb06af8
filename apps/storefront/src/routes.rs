//! # Router
//!
//! All routes mount under `/api/v1`. Catalog reads are public; catalog and
//! order administration require the admin identity; cart and checkout work
//! on the caller's session.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{brands, cart, categories, checkout, coupons, orders, products};
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Brands
        .route("/brands", get(brands::list).post(brands::create))
        .route(
            "/brands/:id",
            get(brands::show).put(brands::update).delete(brands::destroy),
        )
        // Categories
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::show)
                .put(categories::update)
                .delete(categories::destroy),
        )
        // Products (admin CRUD)
        .route("/products", get(products::list).post(products::create))
        .route("/products/create", get(products::create_form))
        .route(
            "/products/:id",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        // Storefront
        .route("/shop", get(products::shop))
        .route("/shop/:slug", get(products::details))
        // Coupons
        .route("/coupons", get(coupons::list).post(coupons::create))
        .route("/coupons/validate", post(coupons::validate))
        .route(
            "/coupons/:id",
            get(coupons::show).put(coupons::update).delete(coupons::destroy),
        )
        // Orders (admin)
        .route("/orders", get(orders::list))
        .route("/orders/:id/items", get(orders::show_items))
        .route("/orders/:id/status", put(orders::update_status))
        // Cart & checkout (session-scoped)
        .route("/cart", get(cart::get_cart).delete(cart::empty_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/increase/:product_id", post(cart::increase_quantity))
        .route("/cart/decrease/:product_id", post(cart::decrease_quantity))
        .route("/cart/item/:product_id", delete(cart::remove_item))
        .route("/cart/apply-coupon", post(cart::apply_coupon))
        .route("/cart/coupon", delete(cart::remove_coupon))
        .route("/cart/checkout", get(checkout::checkout))
        .route("/cart/place-order", post(checkout::place_order))
        .route("/cart/confirmation", get(checkout::confirmation));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
