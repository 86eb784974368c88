use crate::error::{AppError, AppResult, FileError};
use crate::models::question_page::QuestionPage;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// 从 TOML 文件加载数据并转换为 QuestionPage 对象
pub async fn load_toml_to_question_page(toml_file_path: &Path) -> AppResult<QuestionPage> {
    let path_str = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&path_str, e))?;

    let page: QuestionPage = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
        path: path_str.clone(),
        source,
    })?;

    // 设置文件路径
    Ok(page.with_file_path(path_str))
}

/// 从文件夹中加载所有 TOML 文件并转换为 QuestionPage 对象列表
///
/// 单个文件解析失败只记录警告，不影响其他文件
pub async fn load_all_toml_files(folder_path: &str) -> AppResult<Vec<QuestionPage>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut question_pages = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_toml_to_question_page(&path).await {
            Ok(page) => {
                tracing::info!("成功加载 {} 个题目", page.questions.len());
                question_pages.push(page);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(question_pages)
}

/// 将 QuestionPage 写入 `<folder>/<name>.toml`，目录不存在时自动创建
///
/// 同名文件已存在时依次尝试 `<name>-2.toml`、`<name>-3.toml`……
/// 文件名用 `create_new` 占位，并发写入同名题目集也不会互相覆盖。
/// 内容先写入临时文件再改名，加载方不会读到写了一半的文件。
///
/// # 返回
/// 返回写入的文件路径
pub async fn write_question_page(folder_path: &str, page: &QuestionPage) -> AppResult<PathBuf> {
    fs::create_dir_all(folder_path)
        .await
        .map_err(|e| AppError::file_write_failed(folder_path, e))?;

    let content = toml::to_string_pretty(page).map_err(|source| FileError::TomlWriteFailed {
        path: format!("{}/{}.toml", folder_path, page.name),
        source,
    })?;

    let path = claim_page_path(Path::new(folder_path), &page.name).await?;
    let path_str = path.display().to_string();

    let tmp_path = path.with_extension(format!("toml.{}.tmp", Uuid::new_v4().simple()));
    fs::write(&tmp_path, content)
        .await
        .map_err(|e| AppError::file_write_failed(tmp_path.display().to_string(), e))?;

    if let Err(e) = fs::rename(&tmp_path, &path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(AppError::file_write_failed(&path_str, e));
    }

    Ok(path)
}

/// 占用一个尚不存在的 `<name>[-n].toml` 文件名
async fn claim_page_path(folder: &Path, name: &str) -> AppResult<PathBuf> {
    let mut attempt = 1usize;
    loop {
        let file_name = if attempt == 1 {
            format!("{}.toml", name)
        } else {
            format!("{}-{}.toml", name, attempt)
        };
        let candidate = folder.join(file_name);

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(AppError::file_write_failed(candidate.display().to_string(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::ExtractedQuestion;

    fn sample_page() -> QuestionPage {
        let q = ExtractedQuestion::try_new(
            "Capital of France?",
            vec!["Paris".to_string(), "Rome".to_string()],
            0,
        )
        .unwrap();
        QuestionPage::new("geography.pdf", vec![q])
    }

    #[tokio::test]
    async fn test_write_then_load_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();

        let written = write_question_page(&folder, &sample_page()).await.unwrap();
        assert!(written.ends_with("geography.toml"));

        // 非 TOML 文件和损坏的 TOML 文件都不影响加载
        tokio::fs::write(dir.path().join("notes.txt"), "ignored").await.unwrap();
        tokio::fs::write(dir.path().join("broken.toml"), "name = ").await.unwrap();

        let pages = load_all_toml_files(&folder).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "geography");
        assert_eq!(pages[0].questions[0].answer(), "Paris");
        assert!(pages[0].file_path.is_some());
    }

    #[tokio::test]
    async fn test_same_name_gets_numbered_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();

        let first = write_question_page(&folder, &sample_page()).await.unwrap();
        let second = write_question_page(&folder, &sample_page()).await.unwrap();
        assert!(first.ends_with("geography.toml"));
        assert!(second.ends_with("geography-2.toml"));

        let pages = load_all_toml_files(&folder).await.unwrap();
        assert_eq!(pages.len(), 2);

        // 临时文件不应残留
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            assert!(!entry.file_name().to_string_lossy().ends_with(".tmp"));
        }
    }

    #[tokio::test]
    async fn test_concurrent_writes_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_string_lossy().to_string();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let folder = folder.clone();
                tokio::spawn(async move { write_question_page(&folder, &sample_page()).await })
            })
            .collect();

        let mut written = Vec::new();
        for handle in handles {
            written.push(handle.await.unwrap().unwrap());
        }
        written.sort();
        written.dedup();
        assert_eq!(written.len(), 4);
        assert_eq!(load_all_toml_files(&folder).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        let result = load_all_toml_files("/definitely/not/here").await;
        assert!(matches!(
            result,
            Err(AppError::File(FileError::DirectoryNotFound { .. }))
        ));
    }
}
