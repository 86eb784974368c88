use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题目提取错误
    #[error("提取错误: {0}")]
    Extract(#[from] ExtractError),
    /// 文档解码错误
    #[error("解码错误: {0}")]
    Decode(#[from] DecodeError),
    /// 题目数据校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 题库存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 题目提取错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// 文档去除空白后为空
    #[error("文档内容为空")]
    EmptyDocument,
}

/// 文档解码错误
#[derive(Debug, Error)]
pub enum DecodeError {
    /// 不支持的文件类型
    #[error("不支持的文件类型: {file_type}")]
    UnsupportedType { file_type: String },
    /// 主解码器与备用解码器都失败
    #[error("PDF 解析失败 (主解码器: {primary}; 备用解码器: {secondary})")]
    PdfUnreadable { primary: String, secondary: String },
    /// 阻塞任务异常退出
    #[error("解码任务异常退出: {0}")]
    Blocking(String),
}

/// 题目数据校验错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 题干为空
    #[error("题干不能为空")]
    EmptyText,
    /// 选项数量不在 [2, 4]
    #[error("选项数量 {0} 不在 [2, 4] 范围内")]
    OptionCount(usize),
    /// 答案索引越界
    #[error("答案索引 {index} 超出范围 [0, {len})")]
    AnswerOutOfRange { index: i64, len: usize },
    /// 答题记录缺少学生邮箱
    #[error("学生邮箱不能为空")]
    EmptyEmail,
    /// 得分不在 [0, total] 或总分不是正数
    #[error("得分 {score} / 总分 {total} 不合法")]
    ScoreOutOfRange { score: i64, total: i64 },
}

/// 题库存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 数据库访问失败
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    /// 库中记录无法还原为合法题目
    #[error("题目记录损坏 (id: {id}): {source}")]
    Corrupt {
        id: uuid::Uuid,
        source: ValidationError,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
    /// TOML 序列化失败
    #[error("TOML序列化失败 ({path}): {source}")]
    TomlWriteFailed {
        path: String,
        source: toml::ser::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(StoreError::Database(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否属于调用方输入问题（而非服务端故障）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Extract(_) | AppError::Decode(DecodeError::UnsupportedType { .. })
                | AppError::Decode(DecodeError::PdfUnreadable { .. })
                | AppError::Validation(_)
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(AppError::from(ExtractError::EmptyDocument).is_client_error());
        assert!(AppError::from(ValidationError::OptionCount(1)).is_client_error());
        assert!(AppError::from(DecodeError::UnsupportedType {
            file_type: "docx".to_string()
        })
        .is_client_error());
        assert!(!AppError::from(DecodeError::Blocking("panic".to_string())).is_client_error());
    }

    #[test]
    fn test_pdf_error_message_keeps_both_causes() {
        let err = DecodeError::PdfUnreadable {
            primary: "bad xref".to_string(),
            secondary: "no trailer".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bad xref"));
        assert!(msg.contains("no trailer"));
    }
}
