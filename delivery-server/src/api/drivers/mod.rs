//! Drivers API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/drivers | GET | 骑手列表 (可按状态过滤) |
//! | /api/drivers | POST | 注册骑手 (初始 offline) |
//! | /api/drivers/{id} | GET | 单个骑手 |
//! | /api/drivers/{id} | PUT | 更新档案 |
//! | /api/drivers/{id} | DELETE | 软删除 (绑定活跃订单时拒绝) |
//! | /api/drivers/{id}/availability | POST | 手动切换 available/offline |
//! | /api/drivers/{id}/reactivate | POST | 恢复软删除的骑手 |
//! | /api/drivers/{id}/rating | POST | 记录评分 (0–5) |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/drivers", driver_routes())
}

fn driver_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::deactivate),
        )
        .route("/{id}/availability", post(handler::set_availability))
        .route("/{id}/reactivate", post(handler::reactivate))
        .route("/{id}/rating", post(handler::record_rating))
}
