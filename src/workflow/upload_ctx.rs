//! 上传处理上下文
//!
//! 封装"我正在处理哪个文件"这一信息

use std::fmt::Display;

use crate::models::document::file_extension;
use crate::models::UploadedFile;

/// 上传处理上下文
#[derive(Debug, Clone)]
pub struct UploadCtx {
    /// 原始文件名
    pub file_name: String,

    /// 扩展名（小写）
    pub file_type: String,

    /// 文件大小（字节）
    pub file_size: usize,
}

impl UploadCtx {
    pub fn new(file: &UploadedFile) -> Self {
        Self {
            file_name: file.file_name.clone(),
            file_type: file_extension(&file.file_name),
            file_size: file.size(),
        }
    }
}

impl Display for UploadCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文件 {} 类型#{} 大小#{}B]",
            self.file_name, self.file_type, self.file_size
        )
    }
}
