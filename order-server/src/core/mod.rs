//! 核心模块：配置、状态、服务器

mod config;
mod server;
mod state;

pub use config::Config;
pub use server::{Server, build_router};
pub use state::ServerState;
