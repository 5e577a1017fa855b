use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, State,
        multipart::{Multipart, MultipartError, MultipartRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};

use crate::error::AppError;
use crate::state::AppState;

use super::types::{ImageInfo, ResizedImage, UploadForm, UploadedImage};
use super::validator;

/// 表单中的文件字段名
const IMAGE_FIELD: &str = "image";

fn map_multipart_error(e: MultipartError, max_image_size: u64) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            max: max_image_size,
        }
    } else {
        AppError::InvalidForm(e.body_text())
    }
}

/// 读取整个 multipart 表单后再校验，字段顺序不影响结果。
///
/// - 非 multipart 请求视为未提供文件
/// - 只有带文件名（可为空串）的 `image` 字段才算文件，多个时取第一个
/// - 未识别的字段直接丢弃
pub(crate) async fn read_upload_form(
    multipart: Result<Multipart, MultipartRejection>,
    max_image_size: u64,
) -> Result<UploadForm, AppError> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::MissingFile);
    };

    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, max_image_size))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| map_multipart_error(e, max_image_size))?;

        match (name.as_str(), filename) {
            (IMAGE_FIELD, Some(filename)) if form.image.is_none() => {
                form.image = Some(UploadedImage {
                    filename,
                    bytes: data,
                });
            }
            ("width", None) if form.width.is_none() => {
                form.width = Some(String::from_utf8_lossy(&data).into_owned());
            }
            ("height", None) if form.height.is_none() => {
                form.height = Some(String::from_utf8_lossy(&data).into_owned());
            }
            _ => {}
        }
    }
    Ok(form)
}

/// `Content-Disposition: attachment`，非 ASCII 文件名额外附带 RFC 5987 编码
fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mut value = format!("attachment; filename=\"{fallback}\"");
    if !filename.is_ascii() {
        value.push_str("; filename*=UTF-8''");
        for b in filename.bytes() {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                value.push(b as char);
            } else {
                value.push_str(&format!("%{b:02X}"));
            }
        }
    }
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn image_response(out: ResizedImage) -> Response {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&out.content_type()) {
        Ok(ct) => {
            headers.insert(header::CONTENT_TYPE, ct);
        }
        Err(_) => {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            );
        }
    }
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(&out.download_name),
    );
    (StatusCode::OK, headers, Bytes::from(out.bytes)).into_response()
}

async fn resize_inner(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ResizedImage, AppError> {
    let limits = &state.config.image;
    let form = read_upload_form(multipart, limits.max_image_size).await?;
    let req = validator::validate_resize(form, limits)?;
    state.images.resize(req).await
}

#[utoipa::path(
    post,
    path = "/api/resize",
    summary = "缩放图片",
    description = "上传图片并缩放到指定宽高（默认 300x300，范围 1-5000），使用 Lanczos3 重采样，按原格式返回附件。",
    request_body(content = super::types::ResizeForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "缩放后的图片字节（Content-Type: image/<format>）"),
        (status = 400, description = "缺少文件 / 文件名为空 / 宽高非法 / 图片过大", body = crate::error::ErrorResponse),
        (status = 500, description = "解码 / 缩放 / 编码失败", body = crate::error::ErrorResponse)
    ),
    tag = "Image"
)]
pub async fn resize_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    match resize_inner(&state, multipart).await {
        Ok(out) => {
            state.stats.increment_success();
            Ok(image_response(out))
        }
        Err(e) => {
            state.stats.increment_failure();
            if e.is_validation() {
                tracing::warn!("缩放请求校验失败: {}", e);
            } else {
                tracing::error!("Error processing image: {}", e);
            }
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/info",
    summary = "读取图片信息",
    description = "上传图片，返回文件名、格式、颜色模式、尺寸与原始字节数，不做任何处理。",
    request_body(content = super::types::InfoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "图片元数据", body = ImageInfo),
        (status = 400, description = "缺少文件 / 文件名为空", body = crate::error::ErrorResponse),
        (status = 500, description = "无法解码", body = crate::error::ErrorResponse)
    ),
    tag = "Image"
)]
pub async fn image_info(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageInfo>, AppError> {
    let form = read_upload_form(multipart, state.config.image.max_image_size).await?;
    let upload = validator::require_image(form)?;
    let filename = upload.filename.clone();

    match state.images.inspect(upload.filename, upload.bytes).await {
        Ok(info) => {
            tracing::info!("Retrieved info for image: {}", filename);
            Ok(Json(info))
        }
        Err(e) => {
            tracing::error!("Error getting image info: {}", e);
            Err(e)
        }
    }
}

/// 图片相关路由（挂载在 `/api` 下）；请求体上限随图片上限放宽
pub fn create_image_router(body_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/resize", post(resize_image))
        .route("/info", post(image_info))
        .layer(DefaultBodyLimit::max(body_limit))
}
