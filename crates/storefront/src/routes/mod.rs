//! HTTP route handlers for storefront.
//!
//! Every endpoint speaks JSON. Per-visitor state (cart, outfit, wizard step,
//! identity, theme) lives in the session cookie's server-side record.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /shop                   - Filtered listing + facets
//! GET  /products/{id}          - Product detail (unknown id: 303 to /shop)
//!
//! # Cart
//! GET  /cart                   - Cart contents and totals
//! POST /cart/add               - Add a product
//! POST /cart/update            - Change a quantity by a delta
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Cart count badge
//!
//! # Configurator
//! GET  /configurator           - Wizard step, options, outfit, total
//! POST /configurator/select    - Put a product into its slot
//! POST /configurator/next      - Next step
//! POST /configurator/back      - Previous step
//! POST /configurator/suggest   - Apply a suggested outfit
//! POST /configurator/commit    - Move the outfit into the cart
//!
//! # Checkout
//! GET  /checkout               - Order summary (empty cart: 303 to /)
//! POST /checkout               - Place the order
//!
//! # Auth
//! POST /auth/login             - Sign in
//! POST /auth/register          - Create an account
//! POST /auth/logout            - Sign out
//! GET  /auth/me                - Current user
//!
//! # Theme
//! GET  /theme                  - Current theme
//! POST /theme/toggle           - Flip the theme
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod configurator;
pub mod products;
pub mod shop;
pub mod theme;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the configurator routes router.
pub fn configurator_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(configurator::show))
        .route("/select", post(configurator::select))
        .route("/next", post(configurator::next))
        .route("/back", post(configurator::back))
        .route("/suggest", post(configurator::suggest))
        .route("/commit", post(configurator::commit))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the theme routes router.
pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(theme::show))
        .route("/toggle", post(theme::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shop", get(shop::index))
        .route("/products/{id}", get(products::show))
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .nest("/cart", cart_routes())
        .nest("/configurator", configurator_routes())
        .nest("/auth", auth_routes())
        .nest("/theme", theme_routes())
}
