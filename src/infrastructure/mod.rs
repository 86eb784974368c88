//! 基础设施层（Infrastructure）
//!
//! 持有外部资源（数据库连接池、解码器），只向上层暴露能力：
//! - `DocumentLoader` - 上传文件 → 文本
//! - `QuestionStore` - 题库的保存 / 查询 / 删除
//!   - `PgQuestionStore` - Postgres 实现
//!   - `InMemoryQuestionStore` - 内存实现
//! - `AttemptStore` - 答题记录的保存 / 查询
//!   - `PgAttemptStore` - Postgres 实现（与题库共用连接池）
//!   - `InMemoryAttemptStore` - 内存实现

pub mod document_loader;
pub mod memory_store;
pub mod pg_attempt_store;
pub mod pg_store;
pub mod store;

pub use document_loader::DocumentLoader;
pub use memory_store::{InMemoryAttemptStore, InMemoryQuestionStore};
pub use pg_attempt_store::PgAttemptStore;
pub use pg_store::PgQuestionStore;
pub use store::{AttemptStore, QuestionStore};
