use axum::body::Bytes;
use image::{ColorType, ImageFormat};
use serde::{Deserialize, Serialize};

/// 上传的文件部分（请求作用域，响应后即丢弃）
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// 客户端提供的文件名（可能为空字符串）
    pub filename: String,
    pub bytes: Bytes,
}

/// 收集完毕、尚未校验的 multipart 表单
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    /// 第一个带文件名的 `image` 字段
    pub image: Option<UploadedImage>,
    /// 原始 `width` 文本
    pub width: Option<String>,
    /// 原始 `height` 文本
    pub height: Option<String>,
}

/// 通过校验的缩放请求
#[derive(Debug, Clone)]
pub struct ResizeRequest {
    pub filename: String,
    pub bytes: Bytes,
    /// 目标宽度，1..=max_dimension
    pub width: u32,
    /// 目标高度，1..=max_dimension
    pub height: u32,
}

/// 缩放结果
#[derive(Debug, Clone)]
pub struct ResizedImage {
    /// 按原格式重新编码后的字节
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// 原图尺寸
    pub original_size: (u32, u32),
    pub width: u32,
    pub height: u32,
    /// 建议的下载文件名：`resized_<原文件名>`
    pub download_name: String,
}

impl ResizedImage {
    /// `image/<格式名小写>`
    pub fn content_type(&self) -> String {
        format!("image/{}", format_name(self.format).to_ascii_lowercase())
    }
}

/// `/api/info` 响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImageInfo {
    /// 上传时的文件名
    #[schema(example = "photo.png")]
    pub filename: String,
    /// 检测到的格式（PNG / JPEG / GIF / WEBP ...）
    #[schema(example = "PNG")]
    pub format: String,
    /// 颜色模式（L / LA / RGB / RGBA / I;16）
    #[schema(example = "RGB")]
    pub mode: String,
    /// `[width, height]`
    #[schema(value_type = Vec<u32>, example = json!([800, 600]))]
    pub size: [u32; 2],
    #[schema(example = 800)]
    pub width: u32,
    #[schema(example = 600)]
    pub height: u32,
    /// 上传内容的原始字节数
    #[schema(example = 48213)]
    pub file_size_bytes: u64,
}

/// multipart 表单（仅用于 OpenAPI 文档）
#[derive(Debug, utoipa::ToSchema)]
pub struct ResizeForm {
    /// 图片文件
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
    /// 目标宽度（默认 300，范围 1-5000）
    #[schema(example = 300)]
    pub width: Option<i64>,
    /// 目标高度（默认 300，范围 1-5000）
    #[schema(example = 300)]
    pub height: Option<i64>,
}

/// multipart 表单（仅用于 OpenAPI 文档）
#[derive(Debug, utoipa::ToSchema)]
pub struct InfoForm {
    /// 图片文件
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// 格式名沿用常见图像工具的大写写法
pub fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Pnm => "PPM",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Tga => "TGA",
        ImageFormat::Dds => "DDS",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Ico => "ICO",
        ImageFormat::Hdr => "HDR",
        ImageFormat::OpenExr => "EXR",
        ImageFormat::Farbfeld => "FARBFELD",
        ImageFormat::Avif => "AVIF",
        ImageFormat::Qoi => "QOI",
        _ => "UNKNOWN",
    }
}

/// 颜色模式名
pub fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::L16 => "I;16",
        ColorType::La8 | ColorType::La16 => "LA",
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB",
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA",
        _ => "UNKNOWN",
    }
}

/// 去掉客户端可能携带的目录部分
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}
