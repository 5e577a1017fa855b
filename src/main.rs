use image_resizer_api::shutdown::log_final_stats;
use image_resizer_api::{AppConfig, AppState, ShutdownManager, build_router};

#[tokio::main]
async fn main() {
    // 配置需先于日志初始化加载，日志级别来自配置
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config init failed: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_directive().into()),
        )
        .init();

    let shutdown_manager = ShutdownManager::new();
    if let Err(e) = shutdown_manager.start_signal_handler() {
        tracing::error!("信号处理器启动失败: {}", e);
        std::process::exit(1);
    }

    let addr = config.server_addr();
    let shutdown_timeout = config.shutdown.timeout_duration();
    let state = AppState::new(config);
    let stats = state.stats.clone();

    tracing::info!(
        "Starting Image Resizer API v{} on {}",
        state.config.app.version,
        addr
    );
    tracing::info!("Environment: {}", state.config.app.environment);
    tracing::info!(
        "Max image size: {} bytes, parallel workers: {}",
        state.config.image.max_image_size,
        state.images.available_permits()
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {}: {}", addr, e);
            std::process::exit(1);
        });

    tracing::info!("Server: http://{}", addr);
    tracing::info!("Docs: http://{}/docs", addr);
    tracing::info!("Health: http://{}/health", addr);

    let signal_manager = shutdown_manager.clone();
    let graceful = axum::serve(listener, app).with_graceful_shutdown(async move {
        let reason = signal_manager.wait_for_shutdown().await;
        tracing::info!("接收到退出信号: {:?}，开始优雅关闭HTTP服务器...", reason);
    });

    // 收到信号后在途请求最多等待 shutdown_timeout
    let server = tokio::spawn(async move { graceful.await });
    let result = tokio::select! {
        res = server => res,
        _ = async {
            shutdown_manager.wait_for_shutdown().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!("优雅退出超时，强制退出");
            Ok(Ok(()))
        }
    };

    match result {
        Ok(Ok(())) => tracing::info!("Shutting down gracefully..."),
        Ok(Err(e)) => {
            tracing::error!("服务器运行错误: {}", e);
            log_final_stats(&stats);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("服务器任务异常退出: {}", e);
            log_final_stats(&stats);
            std::process::exit(1);
        }
    }

    log_final_stats(&stats);
}
