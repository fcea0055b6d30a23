//! 服务器状态
//!
//! ServerState 持有所有共享组件的单例引用，使用 Arc 实现浅拷贝。
//!
//! | 字段 | 说明 |
//! |------|------|
//! | config | 配置项 (不可变) |
//! | stores | 租户分区的存储集合 |
//! | engine | 订单生命周期引擎 |
//! | board | 看板投影 |
//! | resolver | 骑手分配 |

use std::sync::Arc;

use crate::core::{Config, DbBackend, Result};
use crate::db::Stores;
use crate::orders::{AssignmentResolver, BoardProjector, LifecycleEngine};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub stores: Stores,
    pub engine: LifecycleEngine,
    pub board: BoardProjector,
    pub resolver: AssignmentResolver,
}

impl ServerState {
    /// Open the configured backend and wire up the core components
    pub async fn initialize(config: &Config) -> Result<Self> {
        let stores = match config.db_backend {
            DbBackend::RocksDb => {
                let db_path = config.data_dir.join("db");
                Stores::open(&db_path, config.store_timeout()).await?
            }
            DbBackend::Memory => {
                tracing::warn!("Using in-memory storage, data will not survive a restart");
                Stores::in_memory()
            }
        };

        let engine = LifecycleEngine::new(&stores);
        let board = BoardProjector::new(&stores);
        let resolver = AssignmentResolver::new(&stores, engine.clone());

        Ok(Self {
            config: Arc::new(config.clone()),
            stores,
            engine,
            board,
            resolver,
        })
    }

    /// In-memory state for tests
    pub fn for_tests() -> Self {
        let config = Config::with_overrides(std::env::temp_dir(), 0);
        let stores = Stores::in_memory();
        let engine = LifecycleEngine::new(&stores);
        let board = BoardProjector::new(&stores);
        let resolver = AssignmentResolver::new(&stores, engine.clone());
        Self {
            config: Arc::new(config),
            stores,
            engine,
            board,
            resolver,
        }
    }
}
