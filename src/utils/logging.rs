/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

/// 记录服务启动信息
///
/// # 参数
/// - `addr`: 监听地址
/// - `max_upload_bytes`: 上传大小上限
pub fn log_server_startup(addr: &str, max_upload_bytes: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 题目导入服务启动");
    info!("🌐 监听地址: {}", addr);
    info!("📦 上传大小上限: {} KB", max_upload_bytes / 1024);
    info!("{}", "=".repeat(60));
}

/// 记录待导入文件信息
///
/// # 参数
/// - `total`: 文件总数
/// - `max_concurrent`: 最大并发数
pub fn log_files_found(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待导入的文件", total);
    info!("📋 将以每批 {} 个的方式处理", max_concurrent);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始文件编号
/// - `end`: 结束文件编号
/// - `total`: 文件总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批文件: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功的文件数
/// - `failed`: 失败的文件数
/// - `questions`: 导入的题目总数
pub fn print_final_stats(success: usize, failed: usize, questions: usize) {
    info!("{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, success + failed);
    info!("❌ 失败: {}", failed);
    info!("📝 题目数: {}", questions);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示和预览
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
///
/// # 返回
/// 超出时返回前 `max_len` 个字符加 "..."，否则原样返回
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
