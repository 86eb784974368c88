use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// 一次待记录的答题结果
///
/// 邮箱非空、总分为正、得分在 `[0, total]` 内
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "AttemptDraft")]
pub struct NewAttempt {
    student_email: String,
    test_id: Option<String>,
    score: i32,
    total: i32,
}

impl NewAttempt {
    pub fn try_new(
        student_email: impl Into<String>,
        test_id: Option<String>,
        score: i64,
        total: i64,
    ) -> Result<Self, ValidationError> {
        let student_email = student_email.into().trim().to_string();
        if student_email.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }

        let out_of_range = ValidationError::ScoreOutOfRange { score, total };
        if total < 1 || score < 0 || score > total {
            return Err(out_of_range);
        }
        let total = i32::try_from(total).map_err(|_| out_of_range.clone())?;
        let score = i32::try_from(score).map_err(|_| out_of_range)?;

        Ok(Self {
            student_email,
            test_id: test_id.filter(|t| !t.trim().is_empty()),
            score,
            total,
        })
    }

    pub fn student_email(&self) -> &str {
        &self.student_email
    }

    pub fn test_id(&self) -> Option<&str> {
        self.test_id.as_deref()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn total(&self) -> i32 {
        self.total
    }
}

/// 未经校验的答题记录（HTTP 请求体）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDraft {
    pub student_email: String,
    #[serde(default)]
    pub test_id: Option<String>,
    pub score: i64,
    pub total: i64,
}

impl TryFrom<AttemptDraft> for NewAttempt {
    type Error = ValidationError;

    fn try_from(draft: AttemptDraft) -> Result<Self, Self::Error> {
        NewAttempt::try_new(draft.student_email, draft.test_id, draft.score, draft.total)
    }
}

/// 已记录的答题结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: Uuid,
    pub student_email: String,
    pub test_id: Option<String>,
    pub score: i32,
    pub total: i32,
    pub taken_at: DateTime<Utc>,
}

impl Attempt {
    pub fn new(id: Uuid, attempt: NewAttempt, taken_at: DateTime<Utc>) -> Self {
        Self {
            id,
            student_email: attempt.student_email,
            test_id: attempt.test_id,
            score: attempt.score,
            total: attempt.total,
            taken_at,
        }
    }
}
