use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/order-server | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CURRENCY | gbp | 结算币种 |
/// | STRIPE_SECRET_KEY | (未设置) | 支付网关密钥；缺省时使用内存网关 |
/// | ENFORCE_STATUS_ORDER | false | 是否拒绝订单状态回退 |
/// | EFFECT_RETRY_SECS | 30 | 积分效果队列重试间隔(秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/orders HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 结算币种 (ISO 4217 小写)
    pub currency: String,
    /// 支付网关密钥 (缺省时使用内存网关)
    pub stripe_secret_key: Option<String>,
    /// 是否强制订单状态只能前进 (默认允许任意状态互设)
    pub enforce_status_order: bool,
    /// 积分效果队列重试间隔 (秒)
    pub effect_retry_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/order-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "gbp".into()),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY").ok().filter(|k| !k.is_empty()),
            enforce_status_order: std::env::var("ENFORCE_STATUS_ORDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            effect_retry_secs: std::env::var("EFFECT_RETRY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
