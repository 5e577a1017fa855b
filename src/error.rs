use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用统一错误类型
///
/// 输入类错误返回 400，图片库与内部错误返回 500。
/// `Display` 文本即对外的 `error` 字段，保持与既有客户端兼容。
#[derive(Error, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
pub enum AppError {
    /// 请求中没有 `image` 文件字段
    #[error("No image file provided")]
    MissingFile,

    /// 文件字段存在但文件名为空
    #[error("No file selected")]
    EmptyFilename,

    /// 宽高非整数或超出允许范围
    #[error("Invalid dimensions. Must be between 1 and {max}")]
    InvalidDimensions { max: u32 },

    /// 上传内容超过配置的字节上限
    #[error("Image too large. Max size: {max} bytes")]
    PayloadTooLarge { max: u64 },

    /// multipart 请求体无法解析
    #[error("Invalid multipart form: {0}")]
    InvalidForm(String),

    /// 缩放流程中的解码 / 缩放 / 编码失败
    #[error("Failed to process image: {0}")]
    ImageProcessing(String),

    /// 读取图片元数据失败
    #[error("Failed to get image info: {0}")]
    ImageInfo(String),

    /// 内部服务器错误
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 错误响应体
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// 人类可读的错误信息
    #[schema(example = "No image file provided")]
    pub error: String,

    /// 稳定的错误码，用于程序化处理
    #[schema(example = "MISSING_FILE")]
    pub code: String,

    /// 可选：请求追踪 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile
            | AppError::EmptyFilename
            | AppError::InvalidDimensions { .. }
            | AppError::PayloadTooLarge { .. }
            | AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::ImageProcessing(_) | AppError::ImageInfo(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn stable_code(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MISSING_FILE",
            AppError::EmptyFilename => "EMPTY_FILENAME",
            AppError::InvalidDimensions { .. } => "INVALID_DIMENSIONS",
            AppError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            AppError::InvalidForm(_) => "INVALID_FORM",
            AppError::ImageProcessing(_) => "IMAGE_PROCESSING_FAILED",
            AppError::ImageInfo(_) => "IMAGE_INFO_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 是否为客户端输入校验失败（未触发任何解码）
    pub fn is_validation(&self) -> bool {
        self.status_code() == StatusCode::BAD_REQUEST
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.stable_code().to_string(),
            request_id: crate::request_id::current_request_id(),
        };

        let mut res = Json(body).into_response();
        *res.status_mut() = status;
        res
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("阻塞任务执行失败: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn client_errors_map_to_bad_request() {
        for err in [
            AppError::MissingFile,
            AppError::EmptyFilename,
            AppError::InvalidDimensions { max: 5000 },
            AppError::PayloadTooLarge { max: 10 },
            AppError::InvalidForm("boundary".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err:?}");
            assert!(err.is_validation());
        }
    }

    #[test]
    fn library_errors_surface_underlying_message() {
        let err = AppError::ImageProcessing("unsupported format".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to process image: unsupported format");
        assert!(!err.is_validation());

        let err = AppError::ImageInfo("eof".into());
        assert_eq!(err.to_string(), "Failed to get image info: eof");
    }

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(
            AppError::InvalidDimensions { max: 5000 }.to_string(),
            "Invalid dimensions. Must be between 1 and 5000"
        );
        assert_eq!(
            AppError::PayloadTooLarge { max: 10_485_760 }.to_string(),
            "Image too large. Max size: 10485760 bytes"
        );
    }

    #[tokio::test]
    async fn into_response_writes_error_field() {
        let resp = AppError::EmptyFilename.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let v: serde_json::Value = serde_json::from_slice(&bytes).expect("parse json");
        assert_eq!(v["error"], "No file selected");
        assert_eq!(v["code"], "EMPTY_FILENAME");
        // 未绑定请求上下文时不输出 request_id
        assert!(v.get("request_id").is_none());
    }
}
