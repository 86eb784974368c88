use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Attempt, ExtractedQuestion, NewAttempt, PersistedQuestion, UploadedFile};
use crate::server::response::ApiError;
use crate::server::AppState;
use crate::workflow::UploadReport;

/// multipart 中承载上传文件的字段名
pub const UPLOAD_FIELD: &str = "file";

pub const ROUTES: [&str; 7] = [
    "GET /",
    "GET/POST /questions",
    "GET/PUT/DELETE /questions/:id",
    "POST /upload-pdf",
    "POST /attempts",
    "GET /attempts/by-student",
    "GET /attempts/search",
];

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    ok: bool,
    service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    routes: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// 健康检查，存储不可用时仍返回 200，`ok` 为 false
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = match state.store.ping().await {
        Ok(()) => HealthResponse {
            ok: true,
            service: env!("CARGO_PKG_NAME"),
            db: Some("ok"),
            routes: Some(ROUTES.to_vec()),
            error: None,
        },
        Err(e) => {
            warn!("⚠️ 健康检查: 存储不可用: {}", e);
            HealthResponse {
                ok: false,
                service: env!("CARGO_PKG_NAME"),
                db: None,
                routes: None,
                error: Some(e.to_string()),
            }
        }
    };
    Json(response)
}

pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersistedQuestion>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

/// 创建题目，请求体不合法时统一返回 400 `Invalid payload`
pub async fn create_question(
    State(state): State<AppState>,
    payload: Result<Json<ExtractedQuestion>, JsonRejection>,
) -> Result<(StatusCode, Json<PersistedQuestion>), ApiError> {
    let Json(question) = payload.map_err(|e| {
        warn!("创建题目: 请求体不合法: {}", e.body_text());
        ApiError::invalid_payload()
    })?;

    let saved = state.store.save(&question).await?;
    info!("✓ 创建题目 {}: {}", saved.id, question);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// 非法 ID 与不存在的 ID 一样返回 404
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersistedQuestion>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found())?;
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// 更新题目，请求体不合法返回 400，记录不存在返回 404
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ExtractedQuestion>, JsonRejection>,
) -> Result<Json<PersistedQuestion>, ApiError> {
    let Json(question) = payload.map_err(|e| {
        warn!("更新题目: 请求体不合法: {}", e.body_text());
        ApiError::invalid_payload()
    })?;
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found())?;

    let updated = state
        .store
        .update(id, &question)
        .await?
        .ok_or_else(ApiError::not_found)?;
    info!("✓ 更新题目 {}: {}", id, question);
    Ok(Json(updated))
}

/// 删除是幂等的，记录不存在也返回 `{ ok: true }`
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if let Ok(id) = Uuid::parse_str(&id) {
        if state.store.delete(id).await? {
            info!("🗑️ 已删除题目 {}", id);
        }
    }
    Ok(Json(json!({ "ok": true })))
}

/// 上传 PDF / TXT 文件并导入其中的题目
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReport>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some(UploadedFile::new(file_name, mime_type, bytes.to_vec()));
        break;
    }

    let Some(file) = upload else {
        return Err(ApiError::bad_request("No file uploaded"));
    };

    let report = state.flow.run(file).await?;
    info!("{}", report.message);
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// 记录答题结果，请求体不合法时返回 400 `Invalid payload`
pub async fn record_attempt(
    State(state): State<AppState>,
    payload: Result<Json<NewAttempt>, JsonRejection>,
) -> Result<Json<Attempt>, ApiError> {
    let Json(attempt) = payload.map_err(|e| {
        warn!("记录答题: 请求体不合法: {}", e.body_text());
        ApiError::invalid_payload()
    })?;

    let recorded = state.attempts.record(&attempt).await?;
    info!(
        "✓ 记录答题 {}: {} 得分 {}/{}",
        recorded.id, recorded.student_email, recorded.score, recorded.total
    );
    Ok(Json(recorded))
}

pub async fn attempts_by_student(
    State(state): State<AppState>,
    Query(params): Query<StudentQuery>,
) -> Result<Json<Vec<Attempt>>, ApiError> {
    let email = params
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("email required"))?;
    Ok(Json(state.attempts.by_student(&email).await?))
}

pub async fn search_attempts(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Attempt>>, ApiError> {
    let query = params
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("query required"))?;
    Ok(Json(state.attempts.search(&query).await?))
}
