//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单管理接口 (创建、状态流转、历史)
//! - [`drivers`] - 骑手管理接口 (档案、可用性、评分)
//! - [`board`] - 看板投影接口
//! - [`tracking`] - 顾客订单跟踪 (公开, 无租户头)
//! - [`restaurant`] - 餐厅设置接口
//!
//! 除 `health` 和 `tracking` 外，所有接口都要求网关注入的租户头
//! (`x-restaurant-id` / `x-user-id`)。

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod board;
pub mod drivers;
pub mod health;
pub mod orders;
pub mod restaurant;
pub mod tracking;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(drivers::router())
        .merge(board::router())
        .merge(restaurant::router())
        // Public routes - no tenant headers
        .merge(tracking::router())
        .merge(health::router())
}

/// Build the fully configured application with all middleware
pub fn build_app() -> Router<ServerState> {
    build_router()
        // CORS - dashboard and tracking page run on separate origins
        .layer(CorsLayer::permissive())
        // Gzip compress responses
        .layer(CompressionLayer::new())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
