//! 顾客跟踪 API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/track/{order_number} | GET | 订单进度时间线 | 无 |
//!
//! 公开路由：顾客通过订单号访问，无租户头。响应只暴露顾客自己
//! 提交过的字段加派生的时间线，不含内部 ID、骑手档案或租户信息。

use axum::{Json, Router, extract::Path, extract::State, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{OrderItem, OrderStatus};
use crate::orders::{LifecycleError, TimelineStep, build_timeline};
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/track/{order_number}", get(track))
}

/// Customer-facing view of one order
#[derive(Serialize)]
pub struct TrackingView {
    pub order_number: String,
    pub status: OrderStatus,
    pub customer_name: String,
    pub delivery_address: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery_at: DateTime<Utc>,
    pub timeline: Vec<TimelineStep>,
}

/// GET /api/track/:order_number - 顾客订单跟踪
async fn track(
    State(state): State<ServerState>,
    Path(order_number): Path<String>,
) -> AppResult<Json<TrackingView>> {
    let order = state
        .stores
        .orders
        .get_order_by_number(&order_number)
        .await
        .map_err(LifecycleError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_number)))?;

    let timeline = build_timeline(&order, Utc::now());
    Ok(Json(TrackingView {
        order_number: order.order_number,
        status: order.status,
        customer_name: order.customer_name,
        delivery_address: order.delivery_address,
        items: order.items,
        subtotal: order.subtotal,
        delivery_fee: order.delivery_fee,
        total_amount: order.total_amount,
        created_at: order.created_at,
        estimated_delivery_at: order.estimated_delivery_at,
        timeline,
    }))
}
