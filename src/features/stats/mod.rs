pub mod handler;
pub mod middleware;
pub mod models;

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use chrono::{DateTime, Utc};

pub use handler::create_stats_router;
pub use models::{ServiceStats, StatsResponse, StatsSnapshot};

#[derive(Debug, Clone, Copy, Default)]
struct Counters {
    total: u64,
    successful: u64,
    failed: u64,
}

/// 进程级使用统计：总请求数、缩放成功/失败数与启动时间。
///
/// 三个计数器共用一把锁，`snapshot` 返回同一时刻的一致副本。
#[derive(Debug)]
pub struct StatsTracker {
    counters: Mutex<Counters>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        // 计数器只是整数，持锁方 panic 后数据依然可用
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn increment_total(&self) {
        self.lock().total += 1;
    }

    pub fn increment_success(&self) {
        self.lock().successful += 1;
    }

    pub fn increment_failure(&self) {
        self.lock().failed += 1;
    }

    /// 当前计数与运行时长的一致快照
    pub fn snapshot(&self) -> StatsSnapshot {
        let c = *self.lock();
        StatsSnapshot {
            total_requests: c.total,
            successful_resizes: c.successful,
            failed_resizes: c.failed,
            start_time: self.started_at,
            uptime: self.started.elapsed(),
        }
    }
}
