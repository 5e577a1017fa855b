/// 健康检查与版本信息
pub mod health;

/// 图片缩放与元数据
pub mod image;

/// 使用统计
pub mod stats;

/// Web UI 外壳
pub mod ui;
