use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::question::ExtractedQuestion;

/// 一个文件导出的题目集合（TOML 文件的内容）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPage {
    /// 名称（默认取源文件名去掉扩展名）
    pub name: String,
    /// 源文件名
    pub source_file: String,
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<ExtractedQuestion>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl QuestionPage {
    pub fn new(source_file: impl Into<String>, questions: Vec<ExtractedQuestion>) -> Self {
        let source_file = source_file.into();
        let name = std::path::Path::new(&source_file)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| source_file.clone());
        Self {
            name,
            source_file,
            exported_at: Utc::now(),
            questions,
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
