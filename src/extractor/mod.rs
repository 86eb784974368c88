//! 题目提取器
//!
//! 把结构松散的文档文本还原成选择题记录。
//!
//! ## 流程
//!
//! 1. `segmentation` - 三级回退切分题块（段落 → 题号区间 → 按行分组）
//! 2. `block` - 每个题块解析题干、A-D 选项和答案（答案行优先，其次星号标记）
//! 3. 只有题干非空、选项不少于 2 个、答案在范围内的题块才会被采纳
//!
//! 格式不对的题块不会报错，只是不出现在 `accepted` 中。
//! 提取器是纯函数：没有 I/O，没有共享状态，可以在多个线程中同时使用。

mod block;
pub mod patterns;
mod segmentation;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ExtractError;
use crate::models::ExtractedQuestion;
use crate::utils::truncate_text;

pub use segmentation::SegmentTier;

/// UTF-8 字节序标记
pub const BOM: char = '\u{feff}';

/// 一次提取的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// 采纳的题目，保持文档顺序
    pub accepted: Vec<ExtractedQuestion>,
    /// 按空行切出的段落数（与最终采用哪一级切分无关）
    pub total_blocks_scanned: usize,
    /// 最终采用的切分方式得到的题块数
    pub matched_blocks_used: usize,
    pub tier: SegmentTier,
}

impl ExtractionResult {
    /// 被丢弃的题块数
    pub fn rejected(&self) -> usize {
        self.matched_blocks_used - self.accepted.len()
    }
}

/// 题目提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionExtractor;

impl QuestionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 从文档文本中提取题目
    ///
    /// # 错误
    /// 文本去除空白后为空时返回 [`ExtractError::EmptyDocument`]
    pub fn extract(&self, text: &str) -> Result<ExtractionResult, ExtractError> {
        // Windows 编辑器保存的文本常带 BOM，`str::trim` 不会去掉它
        let text = text.strip_prefix(BOM).unwrap_or(text);
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let segmentation = segmentation::segment(text);
        info!(
            "找到 {} 个候选题块 ({}, 段落数 {})",
            segmentation.blocks.len(),
            segmentation.tier,
            segmentation.paragraphs_scanned
        );

        let mut accepted = Vec::new();
        for (i, b) in segmentation.blocks.iter().enumerate() {
            let Some(parsed) = block::parse_block(&b.body) else {
                debug!("题块 {}: 空白，跳过", i + 1);
                continue;
            };

            debug!(
                "题块 {}: 题干=\"{}\", 选项={}, 答案={:?}",
                i + 1,
                truncate_text(&parsed.question_text, 60),
                parsed.options.len(),
                parsed.answer
            );

            if let Some(question) = parsed.into_question() {
                accepted.push(question);
            }
        }

        Ok(ExtractionResult {
            accepted,
            total_blocks_scanned: segmentation.paragraphs_scanned,
            matched_blocks_used: segmentation.blocks.len(),
            tier: segmentation.tier,
        })
    }
}

/// 便捷函数：使用默认提取器
pub fn extract(text: &str) -> Result<ExtractionResult, ExtractError> {
    QuestionExtractor::new().extract(text)
}
