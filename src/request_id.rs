use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// 请求追踪 ID 头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    /// 当前请求绑定的 request_id，供错误响应回填。
    static TASK_REQUEST_ID: String;
}

/// 获取当前请求上下文中的 request_id。
pub fn current_request_id() -> Option<String> {
    TASK_REQUEST_ID.try_with(|v| v.clone()).ok()
}

fn is_acceptable(v: &str) -> bool {
    !v.is_empty()
        && v.len() <= 128
        && v.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.')
}

fn resolve_request_id(req: &Request) -> String {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| is_acceptable(v))
        .map(str::to_string)
        .unwrap_or_else(|| format!("req_{}", Uuid::new_v4().simple()))
}

/// request_id 中间件：
/// - 透传合法的客户端 `X-Request-Id`，否则生成新值
/// - 为整个请求开启带 request_id 的 tracing span
/// - 回写到响应头
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = resolve_request_id(&req);
    let span = tracing::info_span!(
        "request",
        id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut res = TASK_REQUEST_ID
        .scope(request_id.clone(), next.run(req))
        .instrument(span)
        .await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
