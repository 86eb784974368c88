use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use quiz_import::infrastructure::{
    AttemptStore, InMemoryAttemptStore, InMemoryQuestionStore, PgAttemptStore, PgQuestionStore,
    QuestionStore,
};
use quiz_import::orchestrator::{publish_folder, BatchImporter, ImportTarget};
use quiz_import::server::{self, AppState};
use quiz_import::workflow::UploadFlow;
use quiz_import::Config;

/// 命令行要执行的任务
#[derive(Debug, Clone)]
pub enum Task {
    Serve,
    Import { paths: Vec<PathBuf>, save: bool },
    Publish { folder: Option<String>, keep: bool },
}

/// 应用主结构
pub struct App {
    config: Config,
    task: Task,
    store: Arc<dyn QuestionStore>,
    attempts: Arc<dyn AttemptStore>,
}

impl App {
    /// 初始化应用：只有需要写库的任务才连接数据库
    pub async fn initialize(config: Config, task: Task) -> Result<Self> {
        let needs_database = !matches!(task, Task::Import { save: false, .. });

        let (store, attempts): (Arc<dyn QuestionStore>, Arc<dyn AttemptStore>) = if needs_database {
            let store = PgQuestionStore::connect(&config)
                .await
                .context("连接数据库失败")?;
            // 答题记录与题库共用连接池
            let attempts = PgAttemptStore::new(store.pool().clone());
            attempts
                .init_tables()
                .await
                .context("初始化答题记录表失败")?;
            (Arc::new(store), Arc::new(attempts))
        } else {
            info!("仅导出 TOML，不连接数据库");
            (
                Arc::new(InMemoryQuestionStore::new()),
                Arc::new(InMemoryAttemptStore::new()),
            )
        };

        Ok(Self {
            config,
            task,
            store,
            attempts,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<()> {
        match self.task {
            Task::Serve => {
                let state = AppState::new(self.store, self.attempts, &self.config);
                server::serve(state, &self.config).await
            }
            Task::Import { paths, save } => {
                let flow = Arc::new(UploadFlow::new(self.store, &self.config));
                let target = if save {
                    ImportTarget::Store
                } else {
                    ImportTarget::TomlFolder(self.config.output_folder.clone())
                };
                BatchImporter::new(flow, target, &self.config)
                    .run(&paths)
                    .await
                    .context("批量导入失败")?;
                Ok(())
            }
            Task::Publish { folder, keep } => {
                let folder = folder.unwrap_or_else(|| self.config.output_folder.clone());
                publish_folder(self.store, &folder, keep)
                    .await
                    .with_context(|| format!("发布 {} 失败", folder))?;
                Ok(())
            }
        }
    }
}
