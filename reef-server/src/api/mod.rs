//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health probe (unauthenticated, outside the API base path)
//! - [`users`] - registration, login, user management
//! - [`categories`] - category management
//! - [`products`] - product management
//! - [`orders`] - order workflow (creation, queries, lifecycle)
//!
//! Every resource module follows the same layout: `mod.rs` wires the
//! routes, `handler.rs` holds the handlers.

pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::core::ServerState;

/// Assemble the full application router with middleware layers
pub fn build_router(state: ServerState) -> Router {
    let api_base = state.config.api_base.clone();

    Router::new()
        .merge(health::router())
        .merge(users::router(&api_base))
        .merge(categories::router(&api_base))
        .merge(products::router(&api_base))
        .merge(orders::router(&api_base))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
