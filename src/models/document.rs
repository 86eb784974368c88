//! 上传文件与解码后文档

use serde::Serialize;

use crate::error::DecodeError;

/// 支持的上传格式（用于错误提示）
pub const SUPPORTED_FORMATS: [&str; 2] = ["PDF", "TXT"];

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    /// 根据文件名扩展名和 MIME 类型判断文档类型
    ///
    /// `txt` 扩展名或 `text/plain` 按纯文本处理，`pdf` 扩展名按 PDF 处理
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Result<Self, DecodeError> {
        let file_type = file_extension(file_name);
        if file_type == "txt" || mime_type == Some("text/plain") {
            Ok(DocumentKind::Text)
        } else if file_type == "pdf" {
            Ok(DocumentKind::Pdf)
        } else {
            Err(DecodeError::UnsupportedType { file_type })
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Text => write!(f, "txt"),
            DocumentKind::Pdf => write!(f, "pdf"),
        }
    }
}

/// 文件名最后一个 `.` 之后的部分（小写）；没有 `.` 时返回整个文件名
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// 解码得到的原始文本
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub text: String,
    pub kind: DocumentKind,
    /// 主解码器失败、改用备用解码器时记录主解码器的错误
    pub fallback_reason: Option<String>,
}

impl RawDocument {
    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// 一个待处理的上传文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type,
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("quiz.PDF"), "pdf");
        assert_eq!(file_extension("archive.tar.txt"), "txt");
        assert_eq!(file_extension("README"), "readme");
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect("a.txt", None).unwrap(), DocumentKind::Text);
        assert_eq!(DocumentKind::detect("a.pdf", None).unwrap(), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::detect("notes", Some("text/plain")).unwrap(),
            DocumentKind::Text
        );
        match DocumentKind::detect("a.docx", Some("application/msword")) {
            Err(DecodeError::UnsupportedType { file_type }) => assert_eq!(file_type, "docx"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
