use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::infrastructure::store::{AttemptStore, QuestionStore, ATTEMPT_SEARCH_LIMIT};
use crate::models::{Attempt, ExtractedQuestion, NewAttempt, PersistedQuestion};

/// 内存题库，用于测试和不落库的试运行
#[derive(Debug, Default)]
pub struct InMemoryQuestionStore {
    questions: RwLock<Vec<PersistedQuestion>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.questions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.questions.read().await.is_empty()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn save(&self, question: &ExtractedQuestion) -> AppResult<PersistedQuestion> {
        let persisted = PersistedQuestion::new(Uuid::new_v4(), question.clone(), Utc::now());
        self.questions.write().await.push(persisted.clone());
        Ok(persisted)
    }

    async fn list(&self) -> AppResult<Vec<PersistedQuestion>> {
        // 插入顺序即时间顺序，倒序返回最新的在前
        Ok(self.questions.read().await.iter().rev().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<PersistedQuestion>> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        question: &ExtractedQuestion,
    ) -> AppResult<Option<PersistedQuestion>> {
        let mut questions = self.questions.write().await;
        let Some(slot) = questions.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };
        *slot = PersistedQuestion::new(id, question.clone(), slot.created_at);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|q| q.id != id);
        Ok(questions.len() != before)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// 内存答题记录
#[derive(Debug, Default)]
pub struct InMemoryAttemptStore {
    attempts: RwLock<Vec<Attempt>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptStore for InMemoryAttemptStore {
    async fn record(&self, attempt: &NewAttempt) -> AppResult<Attempt> {
        let recorded = Attempt::new(Uuid::new_v4(), attempt.clone(), Utc::now());
        self.attempts.write().await.push(recorded.clone());
        Ok(recorded)
    }

    async fn by_student(&self, student_email: &str) -> AppResult<Vec<Attempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .iter()
            .rev()
            .filter(|a| a.student_email == student_email)
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Attempt>> {
        let needle = query.to_lowercase();
        Ok(self
            .attempts
            .read()
            .await
            .iter()
            .rev()
            .filter(|a| a.student_email.to_lowercase().contains(&needle))
            .take(ATTEMPT_SEARCH_LIMIT)
            .cloned()
            .collect())
    }
}
