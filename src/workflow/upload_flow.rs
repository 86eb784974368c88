//! 上传处理流程 - 流程层
//!
//! 核心职责：定义"一个上传文件"的完整处理流程
//!
//! 流程顺序：
//! 1. 解码（阻塞线程池）→ 文本
//! 2. 提取 → 合法题目
//! 3. 按文档顺序逐题入库
//! 4. 汇总结果

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, DecodeError};
use crate::extractor::{ExtractionResult, QuestionExtractor};
use crate::infrastructure::{DocumentLoader, QuestionStore};
use crate::models::{PersistedQuestion, RawDocument, UploadedFile};
use crate::utils::truncate_text;
use crate::workflow::upload_ctx::UploadCtx;

/// 解码并提取后的文档（尚未入库）
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub ctx: UploadCtx,
    pub document: RawDocument,
    pub result: ExtractionResult,
}

/// 上传成功后的汇总
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub ok: bool,
    pub created: usize,
    pub questions: Vec<PersistedQuestion>,
    pub scanned_blocks: usize,
    pub matched_blocks: usize,
    /// 主解码器的错误，仅在使用了备用解码器时非空
    pub parse_error: Option<String>,
    pub text_preview: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: usize,
    pub message: String,
}

/// 上传处理流程
///
/// - 编排 解码 → 提取 → 入库
/// - 不关心 HTTP 细节
/// - 题库通过句柄注入
pub struct UploadFlow {
    loader: DocumentLoader,
    extractor: QuestionExtractor,
    store: Arc<dyn QuestionStore>,
    preview_chars: usize,
}

impl UploadFlow {
    pub fn new(store: Arc<dyn QuestionStore>, config: &Config) -> Self {
        Self {
            loader: DocumentLoader::new(),
            extractor: QuestionExtractor::new(),
            store,
            preview_chars: config.preview_chars,
        }
    }

    pub fn store(&self) -> &Arc<dyn QuestionStore> {
        &self.store
    }

    /// 解码并提取，不入库
    pub async fn extract_only(&self, file: UploadedFile) -> AppResult<ExtractedDocument> {
        let ctx = UploadCtx::new(&file);
        info!("{} 开始处理", ctx);

        let loader = self.loader;
        let document = tokio::task::spawn_blocking(move || loader.load(&file))
            .await
            .map_err(|e| DecodeError::Blocking(e.to_string()))??;

        if let Some(reason) = &document.fallback_reason {
            warn!("{} 主解码器失败，已使用备用解码器: {}", ctx, reason);
        }

        let result = self.extractor.extract(&document.text)?;
        info!(
            "{} 题块 {} 个，采纳 {} 个，丢弃 {} 个",
            ctx,
            result.matched_blocks_used,
            result.accepted.len(),
            result.rejected()
        );

        Ok(ExtractedDocument {
            ctx,
            document,
            result,
        })
    }

    /// 完整流程：解码 → 提取 → 入库 → 汇总
    pub async fn run(&self, file: UploadedFile) -> AppResult<UploadReport> {
        let extracted = self.extract_only(file).await?;
        let questions = self.persist(&extracted.result).await?;
        Ok(self.build_report(extracted, questions))
    }

    /// 按 `accepted` 顺序逐题入库
    pub async fn persist(&self, result: &ExtractionResult) -> AppResult<Vec<PersistedQuestion>> {
        let mut saved = Vec::with_capacity(result.accepted.len());
        for question in &result.accepted {
            saved.push(self.store.save(question).await?);
        }
        Ok(saved)
    }

    fn build_report(
        &self,
        extracted: ExtractedDocument,
        questions: Vec<PersistedQuestion>,
    ) -> UploadReport {
        let ExtractedDocument {
            ctx,
            document,
            result,
        } = extracted;
        let created = questions.len();

        let message = if created > 0 {
            format!(
                "Successfully created {} questions from {}",
                created, ctx.file_name
            )
        } else {
            format!(
                "No valid questions found in {}. Please check the format.",
                ctx.file_name
            )
        };

        info!("{} ✓ 入库 {} 道题目", ctx, created);

        UploadReport {
            ok: true,
            created,
            questions,
            scanned_blocks: result.total_blocks_scanned,
            matched_blocks: result.matched_blocks_used,
            parse_error: document.fallback_reason.clone(),
            text_preview: truncate_text(&document.text, self.preview_chars),
            file_name: ctx.file_name,
            file_type: ctx.file_type,
            file_size: ctx.file_size,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;
    use crate::infrastructure::InMemoryQuestionStore;
    use crate::models::DocumentKind;

    const QUIZ: &str = "1) 2+2?\nA) 3\nB) 4\nAnswer: B";

    fn extracted_pdf(fallback_reason: Option<String>) -> ExtractedDocument {
        let file = UploadedFile::new("scan.pdf", Some("application/pdf".into()), vec![0; 16]);
        ExtractedDocument {
            ctx: UploadCtx::new(&file),
            document: RawDocument {
                text: QUIZ.to_string(),
                kind: DocumentKind::Pdf,
                fallback_reason,
            },
            result: extract(QUIZ).unwrap(),
        }
    }

    #[test]
    fn test_report_carries_primary_decoder_error() {
        let flow = UploadFlow::new(Arc::new(InMemoryQuestionStore::new()), &Config::default());

        let report = flow.build_report(extracted_pdf(Some("invalid xref".to_string())), Vec::new());
        assert_eq!(report.parse_error.as_deref(), Some("invalid xref"));
        let body = serde_json::to_value(&report).unwrap();
        assert_eq!(body["parseError"], "invalid xref");

        let report = flow.build_report(extracted_pdf(None), Vec::new());
        let body = serde_json::to_value(&report).unwrap();
        assert!(body["parseError"].is_null());
    }
}
