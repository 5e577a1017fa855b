use axum::{Json, Router, extract::State, routing::get};

use crate::state::AppState;

use super::models::StatsResponse;

#[utoipa::path(
    get,
    path = "/api/stats",
    summary = "使用统计",
    description = "返回进程启动以来的请求总数、缩放成功/失败次数、启动时间与运行时长。计数仅保存在内存中，重启后清零。",
    responses((status = 200, description = "统计快照", body = StatsResponse)),
    tag = "Stats"
)]
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.stats.snapshot().into())
}

pub fn create_stats_router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}
