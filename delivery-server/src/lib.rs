//! Delivery Server - 多租户餐厅外送管理服务
//!
//! # 架构概述
//!
//! - **订单生命周期** (`orders`): 状态机、看板投影、跟踪时间线、骑手分配
//! - **数据库** (`db`): 嵌入式 SurrealDB / 内存双后端的租户分区存储
//! - **租户身份** (`auth`): 网关注入的租户头提取
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! delivery-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # 租户上下文提取
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单生命周期域
//! ├── db/            # 存储层 (surrealdb / memory)
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::TenantContext;
pub use crate::core::{Config, Server, ServerState};
pub use db::Stores;
pub use orders::{AssignmentResolver, BoardProjector, LifecycleEngine, build_timeline};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    // .env is optional; real deployments set variables directly
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}
