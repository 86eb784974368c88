//! Postgres 题库

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppResult, StoreError, ValidationError};
use crate::infrastructure::store::QuestionStore;
use crate::models::{ExtractedQuestion, PersistedQuestion};

const CREATE_QUESTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS questions (
        id uuid PRIMARY KEY,
        text text NOT NULL,
        options text[] NOT NULL,
        answer_index int NOT NULL,
        created_at timestamptz NOT NULL DEFAULT now()
    )
"#;

#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    text: String,
    options: Vec<String>,
    answer_index: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for PersistedQuestion {
    type Error = StoreError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let len = row.options.len();
        let index = usize::try_from(row.answer_index).map_err(|_| StoreError::Corrupt {
            id: row.id,
            source: ValidationError::AnswerOutOfRange {
                index: row.answer_index.into(),
                len,
            },
        })?;
        let question = ExtractedQuestion::try_new(row.text, row.options, index)
            .map_err(|source| StoreError::Corrupt { id: row.id, source })?;
        Ok(PersistedQuestion::new(row.id, question, row.created_at))
    }
}

/// Postgres 题库
#[derive(Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按配置连接数据库并确保表存在
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut options = PgConnectOptions::from_str(&config.database_url)?;
        if config.pg_ssl {
            options = options.ssl_mode(PgSslMode::Require);
        }

        info!("正在连接数据库...");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;
        info!("✓ 数据库已连接");

        let store = Self::new(pool);
        store.init_tables().await?;
        Ok(store)
    }

    /// 建表（已存在时不做任何事）
    pub async fn init_tables(&self) -> AppResult<()> {
        sqlx::query(CREATE_QUESTIONS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn save(&self, question: &ExtractedQuestion) -> AppResult<PersistedQuestion> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            INSERT INTO questions (id, text, options, answer_index)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, options, answer_index, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(question.question_text())
        .bind(question.options().to_vec())
        .bind(question.answer_index() as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(PersistedQuestion::try_from(row)?)
    }

    async fn list(&self) -> AppResult<Vec<PersistedQuestion>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, text, options, answer_index, created_at FROM questions ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let questions = rows
            .into_iter()
            .map(PersistedQuestion::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<PersistedQuestion>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, text, options, answer_index, created_at FROM questions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PersistedQuestion::try_from).transpose()?)
    }

    async fn update(
        &self,
        id: Uuid,
        question: &ExtractedQuestion,
    ) -> AppResult<Option<PersistedQuestion>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            UPDATE questions SET text = $1, options = $2, answer_index = $3
            WHERE id = $4
            RETURNING id, text, options, answer_index, created_at
            "#,
        )
        .bind(question.question_text())
        .bind(question.options().to_vec())
        .bind(question.answer_index() as i32)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PersistedQuestion::try_from).transpose()?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 需要本地 Postgres：DATABASE_URL=... cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_pg_store_round_trip() {
        let config = Config::from_env();
        let store = PgQuestionStore::connect(&config)
            .await
            .expect("连接数据库失败");

        let question = ExtractedQuestion::try_new(
            "Capital of France?",
            vec!["Paris".to_string(), "Rome".to_string()],
            0,
        )
        .unwrap();

        let saved = store.save(&question).await.expect("保存失败");
        assert_eq!(saved.question_text, "Capital of France?");
        assert_eq!(store.get(saved.id).await.unwrap(), Some(saved.clone()));

        let edited = ExtractedQuestion::try_new(
            "Capital of Italy?",
            vec!["Paris".to_string(), "Rome".to_string()],
            1,
        )
        .unwrap();
        let updated = store.update(saved.id, &edited).await.unwrap().unwrap();
        assert_eq!(updated.answer_index, 1);
        assert_eq!(updated.created_at, saved.created_at);

        assert!(store.delete(saved.id).await.unwrap());
    }

    #[test]
    fn test_corrupt_row_is_rejected() {
        let row = QuestionRow {
            id: Uuid::new_v4(),
            text: "q".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            answer_index: -1,
            created_at: Utc::now(),
        };
        assert!(matches!(
            PersistedQuestion::try_from(row),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
