use std::io::Cursor;
use std::sync::Arc;

use axum::body::Bytes;
use image::{DynamicImage, ImageFormat, ImageReader, ImageResult, imageops::FilterType};
use tokio::sync::Semaphore;

use crate::error::AppError;

use super::types::{
    ImageInfo, ResizeRequest, ResizedImage, base_name, color_mode, format_name,
};

/// 图片操作调度：缩放与元数据读取。
///
/// 解码 / 缩放 / 编码均为 CPU 密集型，统一移出 tokio worker，
/// 并用信号量限制同时进行的任务数量。
pub struct ImageService {
    permits: Arc<Semaphore>,
}

impl ImageService {
    pub fn new(parallelism: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(parallelism.max(1))),
        }
    }

    /// 当前可用的处理许可数
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T, AppError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal(format!("获取处理许可失败: {e}")))?;
        Ok(tokio::task::spawn_blocking(job).await?)
    }

    /// 缩放到精确的 `width x height`，按原格式输出
    pub async fn resize(&self, req: ResizeRequest) -> Result<ResizedImage, AppError> {
        let ResizeRequest {
            filename,
            bytes,
            width,
            height,
        } = req;

        let (encoded, format, original_size) = self
            .run_blocking(move || resize_bytes(&bytes, width, height))
            .await?
            .map_err(|e| AppError::ImageProcessing(e.to_string()))?;

        tracing::info!(
            "Successfully resized image from {}x{} to {}x{}",
            original_size.0,
            original_size.1,
            width,
            height
        );

        Ok(ResizedImage {
            bytes: encoded,
            format,
            original_size,
            width,
            height,
            download_name: format!("resized_{}", base_name(&filename)),
        })
    }

    /// 读取格式、颜色模式与尺寸
    pub async fn inspect(&self, filename: String, bytes: Bytes) -> Result<ImageInfo, AppError> {
        let file_size_bytes = bytes.len() as u64;
        let (format, img) = self
            .run_blocking(move || decode(&bytes))
            .await?
            .map_err(|e| AppError::ImageInfo(e.to_string()))?;

        let (width, height) = (img.width(), img.height());
        Ok(ImageInfo {
            filename,
            format: format_name(format).to_string(),
            mode: color_mode(img.color()).to_string(),
            size: [width, height],
            width,
            height,
            file_size_bytes,
        })
    }
}

/// 从内容猜测格式并解码；无法识别格式时按 PNG 处理
fn decode(bytes: &[u8]) -> ImageResult<(ImageFormat, DynamicImage)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format().unwrap_or(ImageFormat::Png);
    let img = reader.decode()?;
    Ok((format, img))
}

/// 解码 → Lanczos3 缩放 → 原格式编码
pub(crate) fn resize_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ImageResult<(Vec<u8>, ImageFormat, (u32, u32))> {
    let (format, img) = decode(bytes)?;
    let original_size = (img.width(), img.height());
    tracing::info!(
        "Resizing image from {}x{} to {}x{}",
        original_size.0,
        original_size.1,
        width,
        height
    );

    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format)?;
    Ok((out.into_inner(), format, original_size))
}
