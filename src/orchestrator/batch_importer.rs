//! 批量导入器 - 编排层
//!
//! ## 职责
//!
//! 命令行批量导入的入口，负责文件收集、并发控制和全局统计。
//!
//! ## 核心功能
//!
//! 1. **收集文件**：展开目录，找出所有 pdf / txt 文件
//! 2. **并发控制**：使用 Semaphore 限制同时处理的文件数
//! 3. **分批处理**：每批完成后再开始下一批
//! 4. **输出**：直接入库，或导出为 TOML 供人工检查后再发布
//! 5. **全局统计**：汇总成功 / 失败文件数和题目数

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::models::{write_question_page, QuestionPage, UploadedFile};
use crate::utils::logging::{
    log_batch_complete, log_batch_start, log_files_found, print_final_stats,
};
use crate::workflow::UploadFlow;

/// 可导入的扩展名
const IMPORTABLE_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub success: usize,
    pub failed: usize,
    /// 入库或导出的题目总数
    pub questions: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
    questions: usize,
}

/// 单个文件的输出方式
#[derive(Debug, Clone)]
pub enum ImportTarget {
    /// 直接写入题库
    Store,
    /// 导出到指定目录的 TOML 文件
    TomlFolder(String),
}

/// 批量导入器
pub struct BatchImporter {
    flow: Arc<UploadFlow>,
    target: ImportTarget,
    max_concurrent: usize,
}

impl BatchImporter {
    pub fn new(flow: Arc<UploadFlow>, target: ImportTarget, config: &Config) -> Self {
        Self {
            flow,
            target,
            max_concurrent: config.max_concurrent_imports.max(1),
        }
    }

    /// 导入给定的文件和目录
    pub async fn run(&self, paths: &[PathBuf]) -> AppResult<ImportStats> {
        let files = collect_files(paths).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到可导入的 pdf / txt 文件");
            return Ok(ImportStats::default());
        }

        log_files_found(files.len(), self.max_concurrent);

        let stats = self.process_all_files(&files).await?;
        print_final_stats(stats.success, stats.failed, stats.questions);
        Ok(stats)
    }

    async fn process_all_files(&self, files: &[PathBuf]) -> AppResult<ImportStats> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let total = files.len();
        let total_batches = total.div_ceil(self.max_concurrent);
        let mut stats = ImportStats::default();

        for batch_start in (0..total).step_by(self.max_concurrent) {
            let batch_end = (batch_start + self.max_concurrent).min(total);
            let batch_num = batch_start / self.max_concurrent + 1;

            log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total);

            let batch = self
                .process_batch(&files[batch_start..batch_end], batch_start, semaphore.clone())
                .await;

            stats.success += batch.success;
            stats.failed += batch.failed;
            stats.questions += batch.questions;

            log_batch_complete(batch_num, batch.success, batch.success + batch.failed);
        }

        Ok(stats)
    }

    async fn process_batch(
        &self,
        batch_files: &[PathBuf],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> BatchResult {
        let mut handles = Vec::new();

        for (idx, path) in batch_files.iter().enumerate() {
            let file_index = batch_start + idx + 1;
            let semaphore = semaphore.clone();
            let flow = self.flow.clone();
            let target = self.target.clone();
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                // Semaphore 不会被关闭，acquire 失败时直接放行
                let _permit = semaphore.acquire_owned().await.ok();
                import_file(&flow, &task_path, &target).await
            });
            handles.push((file_index, path.clone(), handle));
        }

        let mut result = BatchResult::default();
        for (file_index, path, handle) in handles {
            match handle.await {
                Ok(Ok(count)) => {
                    result.success += 1;
                    result.questions += count;
                }
                Ok(Err(e)) => {
                    error!("[文件 {}] ❌ {} 导入失败: {}", file_index, path.display(), e);
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[文件 {}] 任务执行失败: {}", file_index, e);
                    result.failed += 1;
                }
            }
        }

        result
    }
}

/// 导入单个文件
///
/// # 返回
/// 返回入库或导出的题目数
pub async fn import_file(flow: &UploadFlow, path: &Path, target: &ImportTarget) -> AppResult<usize> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let file = UploadedFile::new(file_name, None, bytes);

    match target {
        ImportTarget::Store => {
            let report = flow.run(file).await?;
            info!("{}", report.message);
            Ok(report.created)
        }
        ImportTarget::TomlFolder(folder) => {
            let extracted = flow.extract_only(file).await?;
            let accepted = extracted.result.accepted;
            if accepted.is_empty() {
                warn!("{} ⚠️ 没有合法题目，不生成 TOML", extracted.ctx);
                return Ok(0);
            }

            let count = accepted.len();
            let page = QuestionPage::new(extracted.ctx.file_name.clone(), accepted);
            let written = write_question_page(folder, &page).await?;
            info!("{} ✓ 已导出 {} 道题目 → {}", extracted.ctx, count, written.display());
            Ok(count)
        }
    }
}

/// 展开路径列表：文件直接保留（不检查扩展名），目录取其中的 pdf / txt 文件
pub async fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        if !metadata.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found = Vec::new();
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|_| FileError::DirectoryNotFound {
                path: path.display().to_string(),
            })?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?
        {
            let entry_path = entry.path();
            let importable = entry_path
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| IMPORTABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false);
            if importable && entry_path.is_file() {
                found.push(entry_path);
            }
        }
        found.sort();
        files.extend(found);
    }

    Ok(files)
}
