//! Order API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let user_routes = Router::new()
        .route("/", get(handler::list))
        .route("/my-orders", get(handler::my_orders))
        .route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/{id}/status", put(handler::set_status))
        .layer(middleware::from_fn(require_admin));

    user_routes.merge(admin_routes)
}
