//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (pings the database)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! GET  /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account/profile        - Profile form, prefilled from the account
//! POST /account/profile        - Profile update action
//!
//! # Network directory (requires auth)
//! GET  /network                - Member directory listing
//! GET  /network/{handle}       - Member detail by handle
//! ```

pub mod account;
pub mod auth;
pub mod home;
pub mod network;

use axum::{Router, routing::get};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(account::profile_page).post(account::update_profile),
    )
}

/// Create the network directory routes router.
pub fn network_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(network::index))
        .route("/{handle}", get(network::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Auth routes (rate limited)
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        // Account routes
        .nest("/account", account_routes())
        // Network directory
        .nest("/network", network_routes())
}
