//! Product API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(api_base: &str) -> Router<ServerState> {
    Router::new().nest(&format!("{api_base}/products"), routes())
}

fn routes() -> Router<ServerState> {
    // Mutations are admin-only; reads are public (exempted from the auth gate)
    let admin = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .merge(admin)
}
