//! Statistics API 模块 (管理端)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/statistics", get(handler::get_statistics))
        .layer(middleware::from_fn(require_admin))
}
