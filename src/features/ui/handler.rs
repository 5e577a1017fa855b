use axum::{extract::State, response::Html};
use minijinja::{Environment, context};
use once_cell::sync::Lazy;

use crate::error::AppError;
use crate::state::AppState;

const INDEX_TEMPLATE: &str = "index.html";

/// 页面模板随二进制打包，运行时只需要 `/static` 下的样式与脚本。
static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    if let Err(e) = env.add_template(
        INDEX_TEMPLATE,
        include_str!("../../../templates/index.html"),
    ) {
        tracing::error!("加载页面模板失败: {}", e);
    }
    env
});

fn render_index(state: &AppState) -> Result<String, AppError> {
    let cfg = &state.config;
    let tpl = TEMPLATES
        .get_template(INDEX_TEMPLATE)
        .map_err(|e| AppError::Internal(format!("加载页面模板失败: {e}")))?;
    tpl.render(context! {
        version => cfg.app.version,
        environment => cfg.app.environment,
        default_width => cfg.image.default_width,
        default_height => cfg.image.default_height,
        max_dimension => cfg.image.max_dimension,
        max_image_size => cfg.image.max_image_size,
    })
    .map_err(|e| AppError::Internal(format!("渲染页面模板失败: {e}")))
}

/// Web UI 外壳
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_index(&state).map(Html)
}

#[cfg(test)]
mod tests {
    use super::render_index;
    use crate::config::AppConfig;
    use crate::state::AppState;

    #[test]
    fn index_references_assets_and_config() {
        let mut cfg = AppConfig::default();
        cfg.app.version = "9.9.9".into();
        let html = render_index(&AppState::new(cfg)).expect("render");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Image Resizer"));
        assert!(html.contains("/static/style.css"));
        assert!(html.contains("/static/app.js"));
        assert!(html.contains("9.9.9"));
    }
}
