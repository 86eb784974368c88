//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 命令行下的批量处理和调度。
//!
//! ## 模块划分
//!
//! ### `batch_importer` - 批量导入器
//! - 展开目录，收集 pdf / txt 文件
//! - 控制并发数量（Semaphore）
//! - 每个文件委托给 `UploadFlow`
//! - 直接入库或导出 TOML
//!
//! ### `page_publisher` - 题目集发布器
//! - 加载导出目录中的 TOML 题目集
//! - 逐题入库，发布后清理文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_importer / page_publisher
//!     ↓
//! workflow::UploadFlow (处理单个文件)
//!     ↓
//! extractor (纯函数：文本 → 题目)
//!     ↓
//! infrastructure (DocumentLoader / QuestionStore)
//! ```

pub mod batch_importer;
pub mod page_publisher;

pub use batch_importer::{BatchImporter, ImportStats, ImportTarget};
pub use page_publisher::{publish_folder, PublishStats};
