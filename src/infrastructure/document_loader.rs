//! 文档加载 - 基础设施层
//!
//! 把上传的字节解码为文本：
//! - 纯文本：按 UTF-8 读取（非法字节替换）
//! - PDF：先用 `pdf-extract`，失败后用 `lopdf` 逐页提取再试一次

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use tracing::{info, warn};

use crate::error::DecodeError;
use crate::extractor::BOM;
use crate::models::{DocumentKind, RawDocument, UploadedFile};

/// 文档加载器
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// 解码上传文件
    ///
    /// 同步且可能占用较多 CPU，异步环境中应放到 `spawn_blocking` 里调用
    pub fn load(&self, file: &UploadedFile) -> Result<RawDocument, DecodeError> {
        let kind = DocumentKind::detect(&file.file_name, file.mime_type.as_deref())?;

        match kind {
            DocumentKind::Text => {
                info!("按纯文本处理: {}", file.file_name);
                let text = String::from_utf8_lossy(&file.bytes);
                Ok(RawDocument {
                    text: text.strip_prefix(BOM).unwrap_or(text.as_ref()).to_string(),
                    kind,
                    fallback_reason: None,
                })
            }
            DocumentKind::Pdf => self.load_pdf(&file.file_name, &file.bytes),
        }
    }

    fn load_pdf(&self, file_name: &str, bytes: &[u8]) -> Result<RawDocument, DecodeError> {
        let (text, fallback_reason) = match extract_with_pdf_extract(bytes) {
            Ok(text) => {
                info!("PDF 解析成功: {}", file_name);
                (text, None)
            }
            Err(primary) => {
                warn!("PDF 主解码器失败 ({}): {}", file_name, primary);
                match extract_with_lopdf(bytes) {
                    Ok(text) => {
                        info!("PDF 备用解码器解析成功: {}", file_name);
                        (text, Some(primary))
                    }
                    Err(secondary) => {
                        warn!("PDF 备用解码器也失败 ({}): {}", file_name, secondary);
                        return Err(DecodeError::PdfUnreadable { primary, secondary });
                    }
                }
            }
        };

        Ok(RawDocument {
            text: text.replace('\r', ""),
            kind: DocumentKind::Pdf,
            fallback_reason,
        })
    }
}

/// 主解码器
///
/// `pdf-extract` 遇到部分损坏的文件会 panic，这里一并当作解码失败
fn extract_with_pdf_extract(bytes: &[u8]) -> Result<String, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked while decoding".to_string()),
    }
}

/// 备用解码器：逐页提取文本
fn extract_with_lopdf(bytes: &[u8]) -> Result<String, String> {
    let doc = Document::load_mem(bytes).map_err(|e| e.to_string())?;
    if doc.is_encrypted() {
        return Err("PDF is password-protected".to_string());
    }

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        let content = doc.extract_text(&[*page_num]).map_err(|e| e.to_string())?;
        text.push_str(&content);
        text.push('\n');
    }
    Ok(text)
}
