//! Postgres 答题记录
//!
//! 与题库共用连接池，但作为独立的存储句柄传递

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::infrastructure::store::{AttemptStore, ATTEMPT_SEARCH_LIMIT};
use crate::models::{Attempt, NewAttempt};

const CREATE_ATTEMPTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS attempts (
        id uuid PRIMARY KEY,
        student_email text NOT NULL,
        test_id text,
        score int NOT NULL,
        total int NOT NULL,
        taken_at timestamptz NOT NULL DEFAULT now()
    )
"#;

#[derive(Debug, sqlx::FromRow)]
struct AttemptRow {
    id: Uuid,
    student_email: String,
    test_id: Option<String>,
    score: i32,
    total: i32,
    taken_at: DateTime<Utc>,
}

impl From<AttemptRow> for Attempt {
    fn from(row: AttemptRow) -> Self {
        Self {
            id: row.id,
            student_email: row.student_email,
            test_id: row.test_id,
            score: row.score,
            total: row.total,
            taken_at: row.taken_at,
        }
    }
}

/// 转义 LIKE 通配符，让搜索词按字面匹配
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Postgres 答题记录
#[derive(Clone)]
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 建表（已存在时不做任何事）
    pub async fn init_tables(&self) -> AppResult<()> {
        sqlx::query(CREATE_ATTEMPTS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn record(&self, attempt: &NewAttempt) -> AppResult<Attempt> {
        let row = sqlx::query_as::<_, AttemptRow>(
            r#"
            INSERT INTO attempts (id, student_email, test_id, score, total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, student_email, test_id, score, total, taken_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(attempt.student_email())
        .bind(attempt.test_id())
        .bind(attempt.score())
        .bind(attempt.total())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn by_student(&self, student_email: &str) -> AppResult<Vec<Attempt>> {
        let rows = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT id, student_email, test_id, score, total, taken_at
            FROM attempts WHERE student_email = $1
            ORDER BY taken_at DESC
            "#,
        )
        .bind(student_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Attempt::from).collect())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Attempt>> {
        let rows = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT id, student_email, test_id, score, total, taken_at
            FROM attempts WHERE student_email ILIKE $1
            ORDER BY taken_at DESC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(ATTEMPT_SEARCH_LIMIT as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Attempt::from).collect())
    }
}
