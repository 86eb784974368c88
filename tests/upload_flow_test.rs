use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};

use quiz_import::error::{AppError, DecodeError, ExtractError};
use quiz_import::orchestrator::{publish_folder, BatchImporter, ImportTarget};
use quiz_import::{Config, InMemoryQuestionStore, QuestionStore, UploadFlow, UploadedFile};

const QUIZ: &str =
    "Q1) 2+2?\nA) 3\nB) 4\nAnswer: B\n\nQ2) Capital of France?\nA) Paris\nB) Rome\nAns: A";

fn flow_with_store() -> (UploadFlow, Arc<InMemoryQuestionStore>) {
    let store = Arc::new(InMemoryQuestionStore::new());
    let flow = UploadFlow::new(store.clone(), &Config::default());
    (flow, store)
}

fn text_file(name: &str, text: &str) -> UploadedFile {
    UploadedFile::new(name, Some("text/plain".to_string()), text.as_bytes().to_vec())
}

#[tokio::test]
async fn test_upload_saves_accepted_questions_in_order() {
    let (flow, store) = flow_with_store();

    let report = assert_ok!(flow.run(text_file("quiz.txt", QUIZ)).await);

    assert!(report.ok);
    assert_eq!(report.created, 2);
    assert_eq!(report.scanned_blocks, 2);
    assert_eq!(report.matched_blocks, 2);
    assert_eq!(report.file_name, "quiz.txt");
    assert_eq!(report.file_type, "txt");
    assert_eq!(report.file_size, QUIZ.len());
    assert_eq!(report.message, "Successfully created 2 questions from quiz.txt");
    assert_eq!(report.parse_error, None);
    assert_eq!(report.questions[0].question_text, "2+2?");
    assert_eq!(report.questions[1].question_text, "Capital of France?");

    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_upload_without_valid_questions() {
    let (flow, store) = flow_with_store();

    let report = assert_ok!(flow.run(text_file("notes.txt", "1) Unanswered\nA) a\nB) b")).await);

    assert_eq!(report.created, 0);
    assert_eq!(report.matched_blocks, 1);
    assert_eq!(
        report.message,
        "No valid questions found in notes.txt. Please check the format."
    );
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_text_preview_is_truncated() {
    let (flow, _store) = flow_with_store();
    let long = format!("{}\n\n{}", QUIZ, "x".repeat(500));

    let report = assert_ok!(flow.run(text_file("long.txt", &long)).await);

    assert_eq!(report.text_preview.chars().count(), 203);
    assert!(report.text_preview.ends_with("..."));
}

#[tokio::test]
async fn test_empty_upload_is_rejected() {
    let (flow, store) = flow_with_store();

    let err = assert_err!(flow.run(text_file("blank.txt", "   \n\n ")).await);

    assert!(matches!(err, AppError::Extract(ExtractError::EmptyDocument)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unsupported_upload_is_rejected() {
    let (flow, _store) = flow_with_store();
    let file = UploadedFile::new("slides.pptx", None, b"whatever".to_vec());

    let err = assert_err!(flow.run(file).await);

    match err {
        AppError::Decode(DecodeError::UnsupportedType { file_type }) => assert_eq!(file_type, "pptx"),
        other => panic!("意外的错误: {other}"),
    }
}

#[tokio::test]
async fn test_mime_type_marks_text_without_extension() {
    let (flow, _store) = flow_with_store();

    let report = assert_ok!(flow.run(text_file("pasted", QUIZ)).await);
    assert_eq!(report.created, 2);
}

#[tokio::test]
async fn test_import_to_toml_then_publish() {
    let source_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    std::fs::write(source_dir.path().join("week1.txt"), QUIZ).unwrap();
    std::fs::write(source_dir.path().join("empty.txt"), "1) nothing here").unwrap();
    std::fs::write(source_dir.path().join("ignored.md"), QUIZ).unwrap();

    let output_folder = output_dir.path().to_string_lossy().to_string();
    let config = Config {
        max_concurrent_imports: 2,
        ..Config::default()
    };

    // 导出阶段不写库
    let scratch = Arc::new(InMemoryQuestionStore::new());
    let flow = Arc::new(UploadFlow::new(scratch.clone(), &config));
    let importer = BatchImporter::new(flow, ImportTarget::TomlFolder(output_folder.clone()), &config);

    let stats = assert_ok!(importer.run(&[source_dir.path().to_path_buf()]).await);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.questions, 2);
    assert!(scratch.is_empty().await);
    assert!(output_dir.path().join("week1.toml").exists());

    // 发布阶段写库并删除 TOML
    let store = Arc::new(InMemoryQuestionStore::new());
    let published = assert_ok!(publish_folder(store.clone(), &output_folder, false).await);
    assert_eq!(published.pages, 1);
    assert_eq!(published.questions, 2);
    assert!(!output_dir.path().join("week1.toml").exists());

    let saved = assert_ok!(store.list().await);
    let mut texts: Vec<String> = saved.into_iter().map(|q| q.question_text).collect();
    texts.sort();
    assert_eq!(texts, vec!["2+2?", "Capital of France?"]);
}

#[tokio::test]
async fn test_import_with_missing_file_counts_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.txt");
    std::fs::write(&good, QUIZ).unwrap();
    let bad = dir.path().join("bad.docx");
    std::fs::write(&bad, "not a quiz").unwrap();

    let store = Arc::new(InMemoryQuestionStore::new());
    let flow = Arc::new(UploadFlow::new(store.clone(), &Config::default()));
    let importer = BatchImporter::new(flow, ImportTarget::Store, &Config::default());

    // 直接给出的文件不检查扩展名，交给解码器报错
    let stats = assert_ok!(importer.run(&[good, bad]).await);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_import_same_file_stem_keeps_both_pages() {
    let source_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let nested = source_dir.path().join("other");
    std::fs::create_dir(&nested).unwrap();

    let first = source_dir.path().join("week1.txt");
    let second = nested.join("week1.txt");
    std::fs::write(&first, QUIZ).unwrap();
    std::fs::write(&second, "1) Only one?\nA) yes\nB) no\nAnswer: A").unwrap();

    let output_folder = output_dir.path().to_string_lossy().to_string();
    let config = Config {
        max_concurrent_imports: 2,
        ..Config::default()
    };
    let flow = Arc::new(UploadFlow::new(Arc::new(InMemoryQuestionStore::new()), &config));
    let importer = BatchImporter::new(flow, ImportTarget::TomlFolder(output_folder.clone()), &config);

    // 两个文件在同一批内并发导出
    let stats = assert_ok!(importer.run(&[first, second]).await);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.questions, 3);

    assert!(output_dir.path().join("week1.toml").exists());
    assert!(output_dir.path().join("week1-2.toml").exists());

    let store = Arc::new(InMemoryQuestionStore::new());
    let published = assert_ok!(publish_folder(store.clone(), &output_folder, true).await);
    assert_eq!(published.pages, 2);
    assert_eq!(published.questions, stats.questions);
    assert_eq!(store.len().await, 3);
}
