pub mod attempt;
pub mod document;
pub mod loaders;
pub mod question;
pub mod question_page;

pub use attempt::{Attempt, AttemptDraft, NewAttempt};
pub use document::{DocumentKind, RawDocument, UploadedFile, SUPPORTED_FORMATS};
pub use loaders::{load_all_toml_files, load_toml_to_question_page, write_question_page};
pub use question::{ExtractedQuestion, PersistedQuestion, QuestionDraft};
pub use question_page::QuestionPage;
