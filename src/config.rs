use config::{Config as ConfigBuilder, ConfigError, Environment, File, Map};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "IMAGE_RESIZER_CONFIG";

/// 嵌套环境变量覆盖前缀，例如 `IMAGE_RESIZER__SERVER__HOST`
const ENV_PREFIX: &str = "IMAGE_RESIZER";

/// 平铺的历史环境变量 -> 配置键
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("APP_VERSION", "app.version"),
    ("APP_ENV", "app.environment"),
    ("LOG_LEVEL", "logging.level"),
    ("MAX_IMAGE_SIZE", "image.max_image_size"),
    ("PORT", "server.port"),
];

/// multipart 边界、表单字段等额外开销，叠加在图片上限之上作为请求体上限
const BODY_LIMIT_MARGIN: usize = 1024 * 1024;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    /// 前端静态资源目录（挂载到 `/static`）
    #[serde(default = "ServerConfig::default_static_dir")]
    pub static_dir: String,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8080
    }
    fn default_static_dir() -> String {
        "./static".to_string()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            static_dir: Self::default_static_dir(),
        }
    }
}

/// 版本与环境标识
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfoConfig {
    /// 对外报告的版本号
    #[serde(default = "AppInfoConfig::default_version")]
    pub version: String,
    /// 环境标签（development / staging / production ...）
    #[serde(default = "AppInfoConfig::default_environment")]
    pub environment: String,
}

impl AppInfoConfig {
    fn default_version() -> String {
        "1.0.0".to_string()
    }
    fn default_environment() -> String {
        "development".to_string()
    }
}

impl Default for AppInfoConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            environment: Self::default_environment(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（trace/debug/info/warn/error，大小写不敏感）
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 图片处理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// 单张上传图片的最大字节数
    #[serde(default = "ImageConfig::default_max_image_size")]
    pub max_image_size: u64,
    /// 并发处理许可数（0=自动，取 CPU 核心数）
    #[serde(default)]
    pub max_parallel: u32,
    /// 未提供 width 时的默认宽度
    #[serde(default = "ImageConfig::default_side")]
    pub default_width: u32,
    /// 未提供 height 时的默认高度
    #[serde(default = "ImageConfig::default_side")]
    pub default_height: u32,
    /// 宽高允许的最大值（含）
    #[serde(default = "ImageConfig::default_max_dimension")]
    pub max_dimension: u32,
}

impl ImageConfig {
    fn default_max_image_size() -> u64 {
        10 * 1024 * 1024
    }
    fn default_side() -> u32 {
        300
    }
    fn default_max_dimension() -> u32 {
        5000
    }

    /// 实际可用的并发处理许可数
    pub fn parallelism(&self) -> usize {
        match self.max_parallel {
            0 => num_cpus::get().max(1),
            n => n as usize,
        }
    }

    /// 传输层请求体上限：图片上限加上表单开销。
    ///
    /// 超过该上限的请求在 multipart 读取阶段即被拒绝，同样映射为 “Image too large”。
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_image_size)
            .unwrap_or(usize::MAX)
            .saturating_add(BODY_LIMIT_MARGIN)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_image_size: Self::default_max_image_size(),
            max_parallel: 0,
            default_width: Self::default_side(),
            default_height: Self::default_side(),
            max_dimension: Self::default_max_dimension(),
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 等待在途请求完成的超时时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        30
    }

    /// 获取优雅退出超时时间
    pub fn timeout_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
///
/// 启动时构建一次，之后通过 `AppState` 共享；处理函数不再直接读取环境变量。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppInfoConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件与当前进程环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));
        let env: Map<String, String> = std::env::vars().collect();
        Self::load_from(&path, &env)
    }

    /// 按优先级合并：默认值 < 配置文件（可缺省） < 嵌套环境变量 < 历史平铺环境变量
    pub fn load_from(path: &Path, env: &Map<String, String>) -> Result<Self, ConfigError> {
        tracing::info!("正在从 {:?} 加载配置文件（可缺省）", path);

        let mut builder = ConfigBuilder::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            );

        for (var, key) in LEGACY_ENV_KEYS {
            let value = env
                .get(*var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        tracing::debug!("配置加载完成: {:?}", config);
        Ok(config)
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 静态资源目录
    pub fn static_path(&self) -> PathBuf {
        PathBuf::from(&self.server.static_dir)
    }

    /// 未设置 RUST_LOG 时使用的日志过滤指令
    pub fn default_log_directive(&self) -> String {
        format!(
            "image_resizer_api={},tower_http=info",
            self.logging.level.trim().to_ascii_lowercase()
        )
    }
}
