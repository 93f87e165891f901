//! 认证模块
//!
//! 身份校验边界：令牌的签发属于外部协作方，本服务只做验证。
//! `verify(credential) → CurrentUser { id, is_admin }`，失败即 401。

mod extractor;
mod jwt;
mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
