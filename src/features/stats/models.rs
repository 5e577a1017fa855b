use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 统计快照（进程内部使用）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful_resizes: u64,
    pub failed_resizes: u64,
    pub start_time: DateTime<Utc>,
    pub uptime: Duration,
}

/// 对外暴露的计数字段
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ServiceStats {
    /// 进程启动以来的请求总数（含 /health 与 /api/stats 自身）
    #[schema(example = 42)]
    pub total_requests: u64,
    /// 缩放成功次数
    #[schema(example = 30)]
    pub successful_resizes: u64,
    /// 缩放失败次数（含参数校验失败）
    #[schema(example = 2)]
    pub failed_resizes: u64,
    /// 服务启动时间（RFC3339）
    #[schema(value_type = String, example = "2025-01-01T00:00:00Z")]
    pub start_time: DateTime<Utc>,
}

/// `/api/stats` 响应
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatsResponse {
    pub stats: ServiceStats,
    /// 运行时长（秒，带小数）
    #[schema(example = 3600.5)]
    pub uptime_seconds: f64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(s: StatsSnapshot) -> Self {
        Self {
            stats: ServiceStats {
                total_requests: s.total_requests,
                successful_resizes: s.successful_resizes,
                failed_resizes: s.failed_resizes,
                start_time: s.start_time,
            },
            uptime_seconds: s.uptime.as_secs_f64(),
        }
    }
}
