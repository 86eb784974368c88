//! # Quiz Import
//!
//! 从结构松散的 PDF / 文本文档中导入选择题的服务
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 核心（Extractor）
//! - `extractor/` - 纯函数：文本 → 题目
//! - 三级回退切分（段落 → 题号区间 → 按行分组）
//! - 解析题干、A-D 选项、答案（答案行优先，其次星号标记）
//!
//! ### ② 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `DocumentLoader` - 上传文件 → 文本（PDF 主解码器 + 备用解码器）
//! - `QuestionStore` - 题库（Postgres / 内存）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个上传文件"的完整处理流程
//! - `UploadCtx` - 上下文封装（文件名 + 类型 + 大小）
//! - `UploadFlow` - 流程编排（解码 → 提取 → 入库 → 汇总）
//!
//! ### ④ 对外接口（Server / Orchestration）
//! - `server/` - HTTP 路由，把错误映射为 JSON 响应
//! - `orchestrator/batch_importer` - 命令行批量导入，管理并发
//! - `orchestrator/page_publisher` - 发布人工检查过的 TOML 题目集
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod extractor;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod server;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use extractor::{extract, ExtractionResult, QuestionExtractor, SegmentTier};
pub use infrastructure::{
    AttemptStore, DocumentLoader, InMemoryAttemptStore, InMemoryQuestionStore, PgQuestionStore,
    QuestionStore,
};
pub use models::{Attempt, ExtractedQuestion, NewAttempt, PersistedQuestion, QuestionPage, RawDocument, UploadedFile};
pub use server::{build_router, AppState};
pub use workflow::{UploadCtx, UploadFlow, UploadReport};
