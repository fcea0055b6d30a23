//! Board API 模块
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/board | GET | 三列看板投影 (pending / in_progress / out_for_delivery) |

use axum::{Json, Router, extract::State, routing::get};

use crate::auth::TenantContext;
use crate::core::ServerState;
use crate::orders::BoardView;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/board", get(project))
}

/// GET /api/board - 看板投影 (无副作用，每次读取重新派生)
async fn project(
    State(state): State<ServerState>,
    ctx: TenantContext,
) -> AppResult<Json<BoardView>> {
    let board = state.board.project_board(&ctx).await?;
    Ok(Json(board))
}
