use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// 对外报告的服务名
pub const SERVICE_NAME: &str = "image-resizer-api";

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// 服务状态，恒为 healthy
    #[schema(example = "healthy")]
    pub status: String,
    /// 响应生成时间（RFC3339）
    #[schema(value_type = String, example = "2025-01-01T00:00:00Z")]
    pub timestamp: DateTime<Utc>,
    /// 环境标签
    #[schema(example = "development")]
    pub environment: String,
}

/// 版本信息响应
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VersionResponse {
    #[schema(example = "1.0.0")]
    pub version: String,
    #[schema(example = "image-resizer-api")]
    pub service: String,
    #[schema(example = "development")]
    pub environment: String,
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "健康检查",
    description = "用于探活的健康检查端点，始终返回 healthy。",
    responses((status = 200, description = "服务健康", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        environment: state.config.app.environment.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/api/version",
    summary = "版本信息",
    description = "返回配置中的版本号、服务名与环境标签。",
    responses((status = 200, description = "版本信息", body = VersionResponse)),
    tag = "Health"
)]
pub async fn get_version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.config.app.version.clone(),
        service: SERVICE_NAME.to_string(),
        environment: state.config.app.environment.clone(),
    })
}
