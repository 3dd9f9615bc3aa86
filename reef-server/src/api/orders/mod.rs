//! Order API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | / | GET | list orders (user name expanded) |
//! | / | POST | create order (computes total price) |
//! | /{id} | GET | one order, fully expanded |
//! | /{id} | PUT | update status |
//! | /{id} | DELETE | delete order + owned line items |
//! | /get/totalsales | GET | sum of all order totals |
//! | /get/count | GET | order count |
//! | /get/userorders/{userid} | GET | one user's orders, expanded |
//!
//! All routes sit behind the authentication gate.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router(api_base: &str) -> Router<ServerState> {
    Router::new().nest(&format!("{api_base}/orders"), routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update_status)
                .delete(handler::delete),
        )
        .route("/get/totalsales", get(handler::total_sales))
        .route("/get/count", get(handler::count))
        .route("/get/userorders/{userid}", get(handler::user_orders))
}
