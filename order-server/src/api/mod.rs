//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`checkout`] - 结算接口 (购物车 → 订单)
//! - [`orders`] - 订单查询与状态管理
//! - [`loyalty`] - 积分查询
//! - [`payment`] - 支付意向创建
//! - [`restaurants`] - 餐厅目录与评论
//! - [`recommendations`] - 推荐接口
//! - [`statistics`] - 管理端销售统计

pub mod checkout;
pub mod health;
pub mod loyalty;
pub mod orders;
pub mod payment;
pub mod recommendations;
pub mod restaurants;
pub mod statistics;

use axum::Router;

use crate::core::ServerState;

/// Assemble every resource router.
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(checkout::router())
        .merge(orders::router())
        .merge(loyalty::router())
        .merge(payment::router())
        .merge(restaurants::router())
        .merge(recommendations::router())
        .merge(statistics::router())
}

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
