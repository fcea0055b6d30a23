//! Restaurant API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/restaurant | GET | 当前租户的餐厅信息 |
//! | /api/restaurant/settings | PUT | 更新备餐时间 / 默认配送费 |

use axum::{Json, Router, extract::State, routing::get, routing::put};
use validator::Validate;

use crate::auth::TenantContext;
use crate::core::ServerState;
use crate::db::models::{Restaurant, RestaurantSettingsUpdate};
use crate::orders::LifecycleError;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/restaurant", get(get_restaurant))
        .route("/api/restaurant/settings", put(update_settings))
}

/// GET /api/restaurant - 当前租户的餐厅信息
async fn get_restaurant(
    State(state): State<ServerState>,
    ctx: TenantContext,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .stores
        .restaurants
        .get_restaurant(&ctx.restaurant_id)
        .await
        .map_err(LifecycleError::from)?
        .ok_or_else(|| {
            AppError::NotFound(format!("Restaurant {} not found", ctx.restaurant_id))
        })?;
    Ok(Json(restaurant))
}

/// PUT /api/restaurant/settings - 更新设置
///
/// 只影响后续创建的订单；已有订单的估算时间不变。
async fn update_settings(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(patch): Json<RestaurantSettingsUpdate>,
) -> AppResult<Json<Restaurant>> {
    patch.validate()?;
    let restaurant = state
        .stores
        .restaurants
        .update_settings(&ctx.restaurant_id, patch)
        .await
        .map_err(LifecycleError::from)?
        .ok_or_else(|| {
            AppError::NotFound(format!("Restaurant {} not found", ctx.restaurant_id))
        })?;
    Ok(Json(restaurant))
}
