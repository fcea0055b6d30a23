//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::TenantContext;
use crate::core::ServerState;
use crate::db::models::{Order, OrderHistoryEntry, OrderStatus};
use crate::orders::CreateOrderInput;
use crate::utils::AppResult;

#[derive(Deserialize)]
pub struct ListQuery {
    status: Option<OrderStatus>,
}

/// GET /api/orders - 按状态过滤的订单列表 (默认全部)
pub async fn list(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .stores
        .orders
        .list_orders(&ctx.restaurant_id, query.status)
        .await
        .map_err(crate::orders::LifecycleError::from)?;
    Ok(Json(orders))
}

/// POST /api/orders - 创建订单
pub async fn create(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<Order>> {
    let order = state.engine.create_order(&ctx, input).await?;
    Ok(Json(order))
}

/// GET /api/orders/:id - 单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.engine.get_order(&ctx, &id).await?;
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct TransitionBody {
    pub status: OrderStatus,
    pub driver_id: Option<String>,
    pub notes: Option<String>,
}

/// POST /api/orders/:id/transition - 状态流转
pub async fn transition(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(body): Json<TransitionBody>,
) -> AppResult<Json<Order>> {
    let order = state
        .engine
        .apply_transition(&ctx, &id, body.status, body.driver_id.as_deref(), body.notes)
        .await?;
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct AssignBody {
    pub driver_id: String,
    pub notes: Option<String>,
}

/// POST /api/orders/:id/assign - 绑定骑手 (仅 ready 状态)
pub async fn assign(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(body): Json<AssignBody>,
) -> AppResult<Json<Order>> {
    let order = state
        .resolver
        .assign_driver(&ctx, &id, &body.driver_id, body.notes)
        .await?;
    Ok(Json(order))
}

#[derive(Deserialize, Default)]
pub struct CancelBody {
    pub notes: Option<String>,
}

/// POST /api/orders/:id/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    body: Option<Json<CancelBody>>,
) -> AppResult<Json<Order>> {
    let notes = body.and_then(|Json(b)| b.notes);
    let order = state.engine.cancel_order(&ctx, &id, notes).await?;
    Ok(Json(order))
}

/// GET /api/orders/:id/history - 审计历史 (时间正序)
pub async fn history(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderHistoryEntry>>> {
    let entries = state.engine.list_history(&ctx, &id).await?;
    Ok(Json(entries))
}
