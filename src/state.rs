use std::sync::Arc;

use crate::config::AppConfig;
use crate::features::image::ImageService;
use crate::features::stats::StatsTracker;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 启动时加载的配置（只读）
    pub config: Arc<AppConfig>,
    /// 进程级使用统计
    pub stats: Arc<StatsTracker>,
    /// 图片缩放 / 元数据读取调度（内含并发许可）
    pub images: Arc<ImageService>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let images = ImageService::new(config.image.parallelism());
        Self {
            config: Arc::new(config),
            stats: Arc::new(StatsTracker::new()),
            images: Arc::new(images),
        }
    }
}
