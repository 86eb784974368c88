use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// 选项数量下限
pub const MIN_OPTIONS: usize = 2;
/// 选项数量上限（标签只支持 A-D）
pub const MAX_OPTIONS: usize = 4;

/// 一道合法的选择题
///
/// 只能通过 [`ExtractedQuestion::try_new`] 或反序列化得到，
/// 因此题干非空、选项 2-4 个、答案索引在范围内始终成立。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft", rename_all = "camelCase")]
pub struct ExtractedQuestion {
    question_text: String,
    options: Vec<String>,
    answer_index: usize,
}

impl ExtractedQuestion {
    /// 校验并创建题目
    pub fn try_new(
        question_text: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
    ) -> Result<Self, ValidationError> {
        let question_text = question_text.into();
        if question_text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
            return Err(ValidationError::OptionCount(options.len()));
        }
        if answer_index >= options.len() {
            return Err(ValidationError::AnswerOutOfRange {
                index: answer_index as i64,
                len: options.len(),
            });
        }
        Ok(Self {
            question_text,
            options,
            answer_index,
        })
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    /// 正确选项的文本
    pub fn answer(&self) -> &str {
        &self.options[self.answer_index]
    }
}

/// 未经校验的题目输入（HTTP 请求体 / TOML 文件）
///
/// 题干字段同时接受 `questionText` 和 `text`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(alias = "text")]
    pub question_text: String,
    pub options: Vec<String>,
    pub answer_index: i64,
}

impl TryFrom<QuestionDraft> for ExtractedQuestion {
    type Error = ValidationError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        let len = draft.options.len();
        let index = usize::try_from(draft.answer_index).map_err(|_| {
            ValidationError::AnswerOutOfRange {
                index: draft.answer_index,
                len,
            }
        })?;
        ExtractedQuestion::try_new(draft.question_text, draft.options, index)
    }
}

/// 已入库的题目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQuestion {
    pub id: Uuid,
    pub question_text: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub created_at: DateTime<Utc>,
}

impl PersistedQuestion {
    pub fn new(id: Uuid, question: ExtractedQuestion, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            question_text: question.question_text,
            options: question.options,
            answer_index: question.answer_index,
            created_at,
        }
    }
}

impl std::fmt::Display for ExtractedQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = crate::utils::truncate_text(&self.question_text, 80);
        write!(
            f,
            "{} [选项: {}, 答案: {}]",
            preview,
            self.options.len(),
            (b'A' + self.answer_index as u8) as char
        )
    }
}
