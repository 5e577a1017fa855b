//! 优雅退出
//!
//! Unix 下监听 SIGINT / SIGTERM，Windows 下监听 Ctrl+C；
//! 首次触发后通知所有等待者，重复信号被忽略。

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tracing::{debug, info};

use crate::features::stats::StatsTracker;

/// 退出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// 用户中断信号 (Ctrl+C)
    Interrupt,
    /// 终止信号 (SIGTERM)
    Terminate,
    /// 应用主动请求退出
    Application,
}

/// 优雅退出错误类型
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("信号设置失败: {0}")]
    SignalSetup(String),
}

#[derive(Debug)]
struct ShutdownInner {
    notify: Notify,
    reason: Mutex<Option<ShutdownReason>>,
    shutting_down: AtomicBool,
}

/// 优雅退出管理器
#[derive(Debug, Clone)]
pub struct ShutdownManager {
    inner: Arc<ShutdownInner>,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ShutdownInner {
                notify: Notify::new(),
                reason: Mutex::new(None),
                shutting_down: AtomicBool::new(false),
            }),
        }
    }

    fn recorded_reason(&self) -> ShutdownReason {
        self.inner
            .reason
            .lock()
            .map(|g| g.unwrap_or(ShutdownReason::Application))
            .unwrap_or(ShutdownReason::Application)
    }

    /// 等待退出信号；若已触发则立即返回
    pub async fn wait_for_shutdown(&self) -> ShutdownReason {
        let notified = self.inner.notify.notified();
        if self.is_shutting_down() {
            return self.recorded_reason();
        }
        debug!("等待退出信号...");
        notified.await;
        self.recorded_reason()
    }

    /// 触发优雅退出，只有第一次生效
    pub fn trigger_shutdown(&self, reason: ShutdownReason) {
        if self
            .inner
            .shutting_down
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("重复的退出信号被忽略: {:?}", reason);
            return;
        }

        info!("触发优雅退出: {:?}", reason);
        if let Ok(mut guard) = self.inner.reason.lock() {
            *guard = Some(reason);
        }
        self.inner.notify.notify_waiters();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    /// 启动信号监听任务
    pub fn start_signal_handler(&self) -> Result<(), ShutdownError> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = signal(SignalKind::interrupt())
                .map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;
            let mut sigterm = signal(SignalKind::terminate())
                .map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;

            let manager = self.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("接收到SIGINT信号 (Ctrl+C)");
                        manager.trigger_shutdown(ShutdownReason::Interrupt);
                    }
                    _ = sigterm.recv() => {
                        info!("接收到SIGTERM信号");
                        manager.trigger_shutdown(ShutdownReason::Terminate);
                    }
                }
            });
        }

        #[cfg(not(unix))]
        {
            let manager = self.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("监听Ctrl+C信号失败: {}", e);
                    return;
                }
                info!("接收到Ctrl+C信号");
                manager.trigger_shutdown(ShutdownReason::Interrupt);
            });
        }

        Ok(())
    }
}

/// 退出前输出最终统计
pub fn log_final_stats(stats: &StatsTracker) {
    let s = stats.snapshot();
    info!(
        total_requests = s.total_requests,
        successful_resizes = s.successful_resizes,
        failed_resizes = s.failed_resizes,
        start_time = %s.start_time.to_rfc3339(),
        uptime_secs = s.uptime.as_secs_f64(),
        "Final stats"
    );
}
