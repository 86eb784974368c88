//! HTTP 服务层
//!
//! ## 路由
//!
//! - `GET /` - 健康检查
//! - `GET /questions` / `POST /questions` - 列出 / 创建题目
//! - `GET` / `PUT` / `DELETE /questions/:id` - 查询 / 更新 / 删除题目
//! - `POST /upload-pdf` - 上传文件导入题目（multipart 字段 `file`）
//! - `POST /attempts` - 记录一次答题结果
//! - `GET /attempts/by-student?email=` / `GET /attempts/search?q=` - 查询答题记录
//!
//! 处理器只做请求解析和响应映射，业务交给 `UploadFlow`、`QuestionStore` 和 `AttemptStore`。

pub mod response;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::infrastructure::{AttemptStore, QuestionStore};
use crate::utils::logging::log_server_startup;
use crate::workflow::UploadFlow;

pub use response::{ApiError, ErrorBody};

/// 处理器共享的状态
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
    pub attempts: Arc<dyn AttemptStore>,
    pub flow: Arc<UploadFlow>,
}

impl AppState {
    /// 上传流程与题目路由共用同一个题库句柄
    pub fn new(
        store: Arc<dyn QuestionStore>,
        attempts: Arc<dyn AttemptStore>,
        config: &Config,
    ) -> Self {
        let flow = Arc::new(UploadFlow::new(store.clone(), config));
        Self {
            store,
            attempts,
            flow,
        }
    }
}

/// 构建路由
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/", get(routes::health_handler))
        .route(
            "/questions",
            get(routes::list_questions).post(routes::create_question),
        )
        .route(
            "/questions/:id",
            get(routes::get_question)
                .put(routes::update_question)
                .delete(routes::delete_question),
        )
        .route("/upload-pdf", post(routes::upload_handler))
        .route("/attempts", post(routes::record_attempt))
        .route("/attempts/by-student", get(routes::attempts_by_student))
        .route("/attempts/search", get(routes::search_attempts))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 监听配置的端口直到进程退出
pub async fn serve(state: AppState, config: &Config) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = build_router(state, config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法监听 {}", addr))?;

    log_server_startup(&addr.to_string(), config.max_upload_bytes);

    axum::serve(listener, app).await.context("HTTP 服务异常退出")?;

    info!("服务已停止");
    Ok(())
}
