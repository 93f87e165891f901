//! Order Server - 外卖下单平台的结算与订单服务
//!
//! # 架构概述
//!
//! 本服务承载外卖平台的核心不变量：结算必须对账、积分不得透支、
//! 订单状态是客户跟踪和管理端履约的唯一事实来源。
//!
//! - **结算引擎** (`settlement`): 多餐厅购物车 → 按餐厅拆分订单 + 积分结算
//! - **订单状态机** (`orders`): Paid → Preparing → Out for Delivery → Delivered
//! - **积分账本** (`loyalty`): 非负余额，按整币单位累积
//! - **支付网关** (`payment`): 外部收款边界，仅确认成功的扣款才会生成订单
//! - **认证** (`auth`): 外部签发的 JWT 验证
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 验证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # redb 存储层
//! ├── settlement/    # 结算引擎 (核心)
//! ├── orders/        # 订单存储、状态机、统计
//! ├── loyalty/       # 积分账本
//! ├── payment/       # 支付网关适配器
//! ├── catalog/       # 餐厅目录与推荐
//! ├── reviews/       # 菜品评论
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod loyalty;
pub mod orders;
pub mod payment;
pub mod reviews;
pub mod settlement;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState, build_router};
pub use settlement::SettlementEngine;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
