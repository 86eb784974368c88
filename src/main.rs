mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use app::{App, Task};
use quiz_import::{logger, Config};

/// 选择题导入服务
#[derive(Debug, Parser)]
#[command(name = "quiz_import", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 从 pdf / txt 文件或目录中导入题目
    Import {
        /// 文件或目录
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// 直接写入题库，而不是导出 TOML
        #[arg(long)]
        save: bool,
    },
    /// 把导出目录中的 TOML 题目集写入题库
    Publish {
        /// TOML 目录，默认为 OUTPUT_FOLDER
        #[arg(long)]
        folder: Option<String>,
        /// 发布后保留 TOML 文件
        #[arg(long)]
        keep: bool,
    },
}

impl From<Option<Command>> for Task {
    fn from(command: Option<Command>) -> Self {
        match command.unwrap_or(Command::Serve) {
            Command::Serve => Task::Serve,
            Command::Import { paths, save } => Task::Import { paths, save },
            Command::Publish { folder, keep } => Task::Publish { folder, keep },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config, cli.command.into()).await?.run().await
}
