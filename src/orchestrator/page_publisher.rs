//! 题目集发布器 - 编排层
//!
//! ## 职责
//!
//! 把导出目录中经过人工检查的 TOML 题目集写入题库。
//!
//! ## 核心功能
//!
//! 1. **加载**：读取目录下所有 `*.toml` 题目集
//! 2. **入库**：按文件内顺序逐题保存
//! 3. **文件清理**：发布成功后删除 TOML 文件（可选保留）
//! 4. **统计输出**：记录每个题目集与全局的成功 / 失败数量

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::QuestionStore;
use crate::models::{load_all_toml_files, QuestionPage};
use crate::utils::logging::print_final_stats;

/// 发布统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishStats {
    pub pages: usize,
    pub failed_pages: usize,
    pub questions: usize,
}

/// 发布目录下的全部题目集
///
/// # 参数
/// - `store`: 目标题库
/// - `folder`: TOML 目录
/// - `keep_files`: 发布后是否保留 TOML 文件
pub async fn publish_folder(
    store: Arc<dyn QuestionStore>,
    folder: &str,
    keep_files: bool,
) -> AppResult<PublishStats> {
    info!("📁 正在扫描待发布的题目集: {}", folder);
    let pages = load_all_toml_files(folder).await?;

    if pages.is_empty() {
        warn!("⚠️ 没有找到待发布的TOML文件");
        return Ok(PublishStats::default());
    }

    let mut stats = PublishStats::default();
    for (index, page) in pages.into_iter().enumerate() {
        let page_index = index + 1;
        match publish_page(store.as_ref(), &page, page_index).await {
            Ok(count) => {
                stats.pages += 1;
                stats.questions += count;
                if !keep_files {
                    cleanup_file(page.file_path.as_deref(), page_index).await?;
                }
            }
            Err(e) => {
                error!("[题目集 {}] ❌ {} 发布失败: {}", page_index, page.name, e);
                stats.failed_pages += 1;
            }
        }
    }

    print_final_stats(stats.pages, stats.failed_pages, stats.questions);
    Ok(stats)
}

/// 发布单个题目集
///
/// # 返回
/// 返回入库的题目数
pub async fn publish_page(
    store: &dyn QuestionStore,
    page: &QuestionPage,
    page_index: usize,
) -> AppResult<usize> {
    info!(
        "[题目集 {}] 开始发布: {} (来源: {}, 题目数: {})",
        page_index,
        page.name,
        page.source_file,
        page.questions.len()
    );

    for question in &page.questions {
        store.save(question).await?;
    }

    info!("[题目集 {}] ✅ 发布完成", page_index);
    Ok(page.questions.len())
}

/// 删除已发布的文件
async fn cleanup_file(file_path: Option<&str>, page_index: usize) -> AppResult<()> {
    let Some(file_path) = file_path else {
        warn!("[题目集 {}] ⚠️ 文件路径未设置", page_index);
        return Ok(());
    };

    if Path::new(file_path).exists() {
        tokio::fs::remove_file(file_path)
            .await
            .map_err(|e| AppError::file_write_failed(file_path, e))?;
        info!("[题目集 {}] 🗑️ 文件已删除: {}", page_index, file_path);
    } else {
        warn!("[题目集 {}] ⚠️ 文件不存在: {}", page_index, file_path);
    }

    Ok(())
}
