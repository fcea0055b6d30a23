//! Orders API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | GET | 按状态过滤的订单列表 |
//! | /api/orders | POST | 创建订单 (pending) |
//! | /api/orders/{id} | GET | 单个订单 |
//! | /api/orders/{id}/transition | POST | 状态流转 (可带骑手/备注) |
//! | /api/orders/{id}/assign | POST | 在 ready 状态绑定骑手 |
//! | /api/orders/{id}/cancel | POST | 取消订单 |
//! | /api/orders/{id}/history | GET | 审计历史 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/transition", post(handler::transition))
        .route("/{id}/assign", post(handler::assign))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/history", get(handler::history))
}
