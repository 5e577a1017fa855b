use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::StatsTracker;

/// 不计入 total_requests 的路径前缀：静态资源与 API 文档
const UNCOUNTED_PREFIXES: &[&str] = &["/static/", "/docs", "/api-docs/"];

pub(crate) fn is_counted(path: &str) -> bool {
    !UNCOUNTED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// 计数中间件：在进入处理函数前累加总请求数，
/// 因此 `/api/stats` 的响应已包含本次请求。
pub async fn count_requests(
    State(stats): State<Arc<StatsTracker>>,
    req: Request,
    next: Next,
) -> Response {
    if is_counted(req.uri().path()) {
        stats.increment_total();
    }
    next.run(req).await
}
