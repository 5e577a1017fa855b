//! 请求校验：全部检查都在解码之前完成，非法输入不会触发任何图片解码。

use crate::config::ImageConfig;
use crate::error::AppError;

use super::types::{ResizeRequest, UploadForm, UploadedImage};

/// 检查文件字段存在且文件名非空
pub fn require_image(form: UploadForm) -> Result<UploadedImage, AppError> {
    let image = form.image.ok_or(AppError::MissingFile)?;
    if image.filename.is_empty() {
        return Err(AppError::EmptyFilename);
    }
    Ok(image)
}

/// 解析宽或高。
///
/// 缺省或空白时取默认值；存在但不是整数（如 `abc`、`12.5`）视为非法。
pub fn parse_dimension(raw: Option<&str>, default: u32, max: u32) -> Result<u32, AppError> {
    let invalid = AppError::InvalidDimensions { max };
    let value = match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => i64::from(default),
        Some(s) => s.parse::<i64>().map_err(|_| invalid.clone())?,
    };
    if value <= 0 || value > i64::from(max) {
        return Err(invalid);
    }
    u32::try_from(value).map_err(|_| invalid)
}

/// 缩放请求的完整校验，顺序：
/// 文件缺失 → 文件名为空 → 宽高 → 字节大小
pub fn validate_resize(form: UploadForm, limits: &ImageConfig) -> Result<ResizeRequest, AppError> {
    let width_raw = form.width.clone();
    let height_raw = form.height.clone();
    let image = require_image(form)?;

    let width = parse_dimension(
        width_raw.as_deref(),
        limits.default_width,
        limits.max_dimension,
    )?;
    let height = parse_dimension(
        height_raw.as_deref(),
        limits.default_height,
        limits.max_dimension,
    )?;

    if image.bytes.len() as u64 > limits.max_image_size {
        return Err(AppError::PayloadTooLarge {
            max: limits.max_image_size,
        });
    }

    Ok(ResizeRequest {
        filename: image.filename,
        bytes: image.bytes,
        width,
        height,
    })
}
