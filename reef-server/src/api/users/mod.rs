//! User API module
//!
//! Registration and login are public; reading a user requires
//! authentication; listing, deletion and counting are admin-only.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(api_base: &str) -> Router<ServerState> {
    Router::new().nest(&format!("{api_base}/users"), routes())
}

fn routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", get(handler::list))
        .route("/get/count", get(handler::count))
        .route("/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/{id}", get(handler::get_by_id))
        .merge(admin)
}
