//! Restaurant API 模块
//!
//! 目录只读接口无需认证；创建仅限管理员；评论提交需要登录。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/reviews", get(handler::list_reviews));

    let review_routes = Router::new().route("/{id}/reviews", post(handler::create_review));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(review_routes).merge(manage_routes)
}
