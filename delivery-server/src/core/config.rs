//! 服务器配置
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | HTTP_PORT | 3000 | HTTP 服务端口 |
//! | DATA_DIR | /var/lib/delivery | 数据目录 (数据库、日志) |
//! | DB_BACKEND | rocksdb | 存储后端: rocksdb \| memory |
//! | ENVIRONMENT | development | 运行环境 |
//! | REQUEST_TIMEOUT_MS | 5000 | 单次存储调用超时(毫秒) |
//! | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭超时(毫秒) |
//! | LOG_LEVEL | info | 日志级别 |
//! | LOG_DIR | (unset) | 设置后启用按天滚动的文件日志 |
//!
//! # 示例
//!
//! ```ignore
//! DATA_DIR=/data/delivery HTTP_PORT=8080 cargo run
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// 存储后端选择
///
/// `memory` 模式不落盘，用于本地开发和测试。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackend {
    RocksDb,
    Memory,
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据目录，存储数据库文件和日志
    pub data_dir: PathBuf,
    /// 存储后端
    pub db_backend: DbBackend,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 单次存储调用超时 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (None = 仅输出到 stdout)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/var/lib/delivery")),
            db_backend: match std::env::var("DB_BACKEND").as_deref() {
                Ok("memory") => DbBackend::Memory,
                _ => DbBackend::RocksDb,
            },
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().map(PathBuf::from),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(data_dir: impl Into<PathBuf>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.data_dir = data_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
