use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{health, image, stats, ui};
use crate::openapi::ApiDoc;
use crate::request_id::request_id_middleware;
use crate::state::AppState;

fn compression_predicate() -> impl tower_http::compression::predicate::Predicate {
    use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};

    // 图片本身已压缩，再压缩只浪费 CPU；JSON / HTML / JS / CSS 正常压缩。
    SizeAbove::default()
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::const_new("application/octet-stream"))
}

/// 组装完整路由。
///
/// 层次（由外到内）：request_id → 压缩 → 请求计数 → 路由。
pub fn build_router(state: AppState) -> Router {
    let api_router = Router::<AppState>::new()
        .route("/version", get(health::get_version))
        .merge(stats::create_stats_router())
        .merge(image::create_image_router(state.config.image.body_limit()));

    Router::<AppState>::new()
        .route("/", get(ui::index))
        .route("/health", get(health::health_check))
        .nest("/api", api_router)
        .nest_service("/static", ServeDir::new(state.config.static_path()))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn_with_state(
            state.stats.clone(),
            stats::middleware::count_requests,
        ))
        .layer(CompressionLayer::new().compress_when(compression_predicate()))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::compression_predicate;
    use axum::body::Body;
    use axum::http::{Response as HttpResponse, header};
    use tower_http::compression::predicate::Predicate;

    fn should_compress_for(ct: &str) -> bool {
        let resp = HttpResponse::builder()
            .header(header::CONTENT_TYPE, ct)
            .body(Body::from(vec![b'x'; 2048]))
            .unwrap();
        compression_predicate().should_compress(&resp)
    }

    #[test]
    fn images_are_not_compressed() {
        assert!(!should_compress_for("image/png"));
        assert!(!should_compress_for("image/jpeg"));
        assert!(!should_compress_for("application/octet-stream"));
    }

    #[test]
    fn text_responses_are_compressed() {
        assert!(should_compress_for("application/json"));
        assert!(should_compress_for("text/html; charset=utf-8"));
    }
}
