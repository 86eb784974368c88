//! 题库与答题记录的存储接口
//!
//! 存储对象通过 `Arc<dyn QuestionStore>` 显式传递，不使用模块级全局状态

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Attempt, ExtractedQuestion, NewAttempt, PersistedQuestion};

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// 保存一道题目并分配 ID
    async fn save(&self, question: &ExtractedQuestion) -> AppResult<PersistedQuestion>;

    /// 按创建时间倒序列出全部题目
    async fn list(&self) -> AppResult<Vec<PersistedQuestion>>;

    async fn get(&self, id: Uuid) -> AppResult<Option<PersistedQuestion>>;

    /// 覆盖题干、选项和答案，保留 ID 和创建时间；记录不存在时返回 `None`
    async fn update(
        &self,
        id: Uuid,
        question: &ExtractedQuestion,
    ) -> AppResult<Option<PersistedQuestion>>;

    /// 删除题目，返回是否确实删除了记录
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// 存储是否可用
    async fn ping(&self) -> AppResult<()>;
}

/// 模糊搜索答题记录时最多返回的条数
pub const ATTEMPT_SEARCH_LIMIT: usize = 50;

#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// 记录一次答题结果并分配 ID
    async fn record(&self, attempt: &NewAttempt) -> AppResult<Attempt>;

    /// 某个学生的全部记录，最新的在前
    async fn by_student(&self, student_email: &str) -> AppResult<Vec<Attempt>>;

    /// 按邮箱片段（不区分大小写）搜索，最新的在前，最多 [`ATTEMPT_SEARCH_LIMIT`] 条
    async fn search(&self, query: &str) -> AppResult<Vec<Attempt>>;
}
