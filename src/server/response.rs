//! 错误响应
//!
//! 把 `AppError` 映射为 HTTP 状态码和 JSON 错误体

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{AppError, DecodeError, ExtractError};
use crate::models::SUPPORTED_FORMATS;

const PDF_SUGGESTIONS: [&str; 4] = [
    "Try re-saving the PDF in a different format",
    "Convert the PDF to a text file (.txt) with the same Q&A format",
    "Use a different PDF file",
    "Ensure the PDF is not password-protected",
];

/// JSON 错误体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_formats: Option<Vec<String>>,
}

/// 处理器返回的错误
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
                suggestions: Vec::new(),
                supported_formats: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    pub fn invalid_payload() -> Self {
        Self::bad_request("Invalid payload")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorBody {
        &self.body
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.body.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        self
    }

    /// 上传失败的错误体都附带支持的格式
    fn with_supported_formats(mut self) -> Self {
        self.body.supported_formats = Some(SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect());
        self
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Extract(ExtractError::EmptyDocument) => {
                warn!("上传被拒绝: 文件没有文本内容");
                ApiError::bad_request("No text content found in the file").with_supported_formats()
            }
            AppError::Decode(DecodeError::UnsupportedType { file_type }) => {
                warn!("上传被拒绝: 不支持的文件类型 {}", file_type);
                ApiError::bad_request("Unsupported file type")
                    .with_details(format!("File type '{}' is not supported", file_type))
                    .with_suggestions(&["Please upload a PDF or TXT file"])
                    .with_supported_formats()
            }
            AppError::Decode(DecodeError::PdfUnreadable { primary, secondary }) => {
                warn!("上传被拒绝: PDF 无法解析 ({} / {})", primary, secondary);
                ApiError::bad_request(
                    "PDF parsing failed. The PDF may be corrupted, password-protected, or have structural issues.",
                )
                .with_details(format!(
                    "Primary error: {}, Secondary error: {}",
                    primary, secondary
                ))
                .with_suggestions(&PDF_SUGGESTIONS)
                .with_supported_formats()
            }
            AppError::Validation(e) => {
                warn!("请求数据不合法: {}", e);
                ApiError::invalid_payload().with_details(e.to_string())
            }
            other => {
                error!("❌ 请求处理失败: {}", other);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        warn!("multipart 请求体读取失败: {}", err);
        ApiError::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
