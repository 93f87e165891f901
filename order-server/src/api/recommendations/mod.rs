//! Recommendations API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/recommendations/{restaurant_id}",
        get(handler::for_restaurant),
    )
}
