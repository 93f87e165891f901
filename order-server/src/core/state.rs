//! 服务器状态
//!
//! [`ServerState`] 持有所有服务的共享引用，使用 `Arc`/内部共享实现浅拷贝，
//! 作为 axum 的应用状态注入到每个处理函数。
//!
//! # 服务组件
//!
//! | 字段 | 说明 |
//! |------|------|
//! | config | 配置项 (不可变) |
//! | db | 嵌入式数据库 (redb) |
//! | orders / tracker | 订单存储与状态机 |
//! | ledger | 积分账本 |
//! | catalog / reviews | 餐厅目录与评论 |
//! | gateway | 支付网关适配器 |
//! | engine | 结算引擎 |
//! | effects | 结算后积分效果队列 |
//! | jwt_service | JWT 验证服务 |
//! | recommender | 推荐评分边界 |

use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtService;
use crate::catalog::{CatalogStore, PopularityRecommender, Recommender};
use crate::core::Config;
use crate::db::Db;
use crate::loyalty::LoyaltyLedger;
use crate::orders::{OrderStore, OrderTracker};
use crate::payment::{MockGateway, PaymentGateway, StripeGateway};
use crate::reviews::ReviewStore;
use crate::settlement::{EffectQueue, SettlementEngine};

#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库
    pub db: Db,
    /// 订单存储
    pub orders: OrderStore,
    /// 订单状态机 (读写契约)
    pub tracker: OrderTracker,
    /// 积分账本
    pub ledger: LoyaltyLedger,
    /// 餐厅目录
    pub catalog: CatalogStore,
    /// 评论存储
    pub reviews: ReviewStore,
    /// 支付网关
    pub gateway: Arc<dyn PaymentGateway>,
    /// 结算引擎
    pub engine: Arc<SettlementEngine>,
    /// 积分效果队列
    pub effects: EffectQueue,
    /// JWT 验证服务
    pub jwt_service: Arc<JwtService>,
    /// 推荐评分
    pub recommender: Arc<dyn Recommender>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir).expect("Failed to create database directory");

        let db = Db::open(db_dir.join("orders.db")).expect("Failed to initialize database");

        let gateway: Arc<dyn PaymentGateway> = match &config.stripe_secret_key {
            Some(key) => Arc::new(StripeGateway::new(key.clone())),
            None => {
                tracing::warn!(
                    "STRIPE_SECRET_KEY not set, using in-memory payment gateway (development only)"
                );
                Arc::new(MockGateway::new())
            }
        };

        Self::with_parts(config.clone(), db, gateway)
    }

    /// 手动装配状态 (测试和内嵌场景用)
    pub fn with_parts(config: Config, db: Db, gateway: Arc<dyn PaymentGateway>) -> Self {
        let orders = OrderStore::new(db.clone());
        let tracker = OrderTracker::new(orders.clone(), config.enforce_status_order);
        let ledger = LoyaltyLedger::new(db.clone());
        let catalog = CatalogStore::new(db.clone());
        let reviews = ReviewStore::new(db.clone());
        let effects = EffectQueue::new(db.clone(), ledger.clone());

        let engine = Arc::new(SettlementEngine::new(
            Arc::new(orders.clone()),
            ledger.clone(),
            catalog.clone(),
            gateway.clone(),
            effects.clone(),
            config.currency.clone(),
        ));

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self {
            config,
            db,
            orders,
            tracker,
            ledger,
            catalog,
            reviews,
            gateway,
            engine,
            effects,
            jwt_service,
            recommender: Arc::new(PopularityRecommender),
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用
    ///
    /// 启动的任务：
    /// - 积分效果队列重试 (EffectQueue)
    pub fn start_background_tasks(&self) {
        let _ = self
            .effects
            .spawn_retry_task(Duration::from_secs(self.config.effect_retry_secs));
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
