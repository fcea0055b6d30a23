//! Driver API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::TenantContext;
use crate::core::ServerState;
use crate::db::models::{Driver, DriverCreate, DriverStatus, DriverUpdate};
use crate::utils::AppResult;

#[derive(Deserialize, Default)]
pub struct ListQuery {
    status: Option<DriverStatus>,
    /// Include soft-deleted drivers in the listing
    #[serde(default)]
    include_inactive: bool,
}

/// GET /api/drivers - 骑手列表
pub async fn list(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Driver>>> {
    let drivers = state
        .resolver
        .list_drivers(&ctx, query.status, query.include_inactive)
        .await?;
    Ok(Json(drivers))
}

/// POST /api/drivers - 注册骑手
pub async fn create(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(input): Json<DriverCreate>,
) -> AppResult<Json<Driver>> {
    let driver = state.resolver.create_driver(&ctx, input).await?;
    Ok(Json(driver))
}

/// GET /api/drivers/:id - 单个骑手
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Driver>> {
    let driver = state.resolver.get_driver(&ctx, &id).await?;
    Ok(Json(driver))
}

/// PUT /api/drivers/:id - 更新档案
pub async fn update(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(patch): Json<DriverUpdate>,
) -> AppResult<Json<Driver>> {
    let driver = state.resolver.update_driver(&ctx, &id, patch).await?;
    Ok(Json(driver))
}

/// DELETE /api/drivers/:id - 软删除
pub async fn deactivate(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Driver>> {
    let driver = state.resolver.deactivate_driver(&ctx, &id).await?;
    Ok(Json(driver))
}

/// POST /api/drivers/:id/reactivate - 恢复软删除的骑手
pub async fn reactivate(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Driver>> {
    let driver = state.resolver.reactivate_driver(&ctx, &id).await?;
    Ok(Json(driver))
}

#[derive(Deserialize)]
pub struct AvailabilityBody {
    pub status: DriverStatus,
}

/// POST /api/drivers/:id/availability - 手动切换 available/offline
pub async fn set_availability(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(body): Json<AvailabilityBody>,
) -> AppResult<Json<Driver>> {
    let driver = state.resolver.set_availability(&ctx, &id, body.status).await?;
    Ok(Json(driver))
}

#[derive(Deserialize)]
pub struct RatingBody {
    pub rating: f64,
}

/// POST /api/drivers/:id/rating - 记录评分
pub async fn record_rating(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(body): Json<RatingBody>,
) -> AppResult<Json<Driver>> {
    let driver = state.resolver.record_rating(&ctx, &id, body.rating).await?;
    Ok(Json(driver))
}
