//! HTTP route handlers for the storefront.
//!
//! Every form posts and then redirects (303) to a page that renders the
//! result, with outcome messages carried as session flashes.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - Landing page
//! GET  /about, /help                   - Markdown content pages
//! GET  /health, /health/ready          - Health checks
//!
//! # Location
//! GET  /location?q=                    - Location picker
//! POST /location                       - Set location
//! POST /location/detect                - Simulated detection
//!
//! # Shops
//! GET  /shops?q=                       - Shop directory
//! GET  /shops/{id}?q=&category=        - Shop detail with items
//!
//! # Cart
//! GET  /cart                           - Cart page
//! GET  /cart/count                     - Cart badge fragment
//! POST /cart/add                       - Add an item
//! POST /cart/update                    - Set an item's quantity
//! POST /cart/remove                    - Remove an item
//! POST /cart/clear                     - Empty the cart
//!
//! # Checkout
//! GET  /checkout                       - Delivery and payment form
//! POST /checkout                       - Place the order
//!
//! # Auth
//! GET  /auth/{kind}?mode=              - Login / signup page per user kind
//! POST /auth/{kind}/login              - Simulated login
//! POST /auth/{kind}/signup             - Signup
//! POST /auth/logout                    - Sign out
//!
//! # Profile
//! GET  /profile                        - Profile and order history
//! POST /profile                        - Update name and phone
//!
//! # Delivery partner (requires delivery login)
//! GET  /delivery/setup                 - Onboarding form
//! POST /delivery/setup                 - Submit onboarding (multipart)
//! GET  /delivery/orders?tab=           - Available / my deliveries
//! POST /delivery/orders/{id}/accept    - Claim an order
//! POST /delivery/orders/{id}/start     - Start delivery
//! POST /delivery/orders/{id}/complete  - Mark delivered
//!
//! # Store owner (requires store login)
//! GET  /store/setup                    - Store profile form
//! POST /store/setup                    - Save store profile
//! GET  /store/dashboard?view=&q=&shop= - Dashboard (overview/manage/add/orders)
//! POST /store/products                 - Add a product
//! POST /store/products/{id}/toggle-stock
//! POST /store/products/{id}/select     - Toggle selection
//! POST /store/products/select-all      - Toggle all visible
//! POST /store/products/delete          - Delete selected
//! POST /store/orders/{id}/accept       - Accept an order
//! POST /store/orders/{id}/prepare      - Start preparing
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod delivery;
pub mod health;
pub mod home;
pub mod location;
pub mod pages;
pub mod profile;
pub mod shops;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// All page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/about", get(pages::about))
        .route("/help", get(pages::help))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/profile", get(profile::show).post(profile::update))
        .nest("/location", location_routes())
        .nest("/shops", shop_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/delivery", delivery_routes())
        .nest("/store", store_routes())
}

/// Create the location routes router.
pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(location::show).post(location::set))
        .route("/detect", post(location::detect))
}

/// Create the shop routes router.
pub fn shop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shops::index))
        .route("/{id}", get(shops::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", get(checkout::show).post(checkout::place_order))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(auth::logout))
        .route("/{kind}", get(auth::page))
        .route("/{kind}/login", post(auth::login))
        .route("/{kind}/signup", post(auth::signup))
}

/// Create the delivery partner routes router.
pub fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/setup", get(delivery::setup_page).post(delivery::setup))
        .route("/orders", get(delivery::orders))
        .route("/orders/{id}/accept", post(delivery::accept))
        .route("/orders/{id}/start", post(delivery::start))
        .route("/orders/{id}/complete", post(delivery::complete))
}

/// Create the store owner routes router.
pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/setup", get(store::setup_page).post(store::setup))
        .route("/dashboard", get(store::dashboard))
        .route("/products", post(store::add_product))
        .route("/products/select-all", post(store::select_all))
        .route("/products/delete", post(store::delete_selected))
        .route("/products/{id}/toggle-stock", post(store::toggle_stock))
        .route("/products/{id}/select", post(store::select))
        .route("/orders/{id}/accept", post(store::accept_order))
        .route("/orders/{id}/prepare", post(store::prepare_order))
}
