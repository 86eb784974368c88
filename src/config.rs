/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP 监听端口
    pub port: u16,
    /// Postgres 连接串
    pub database_url: String,
    /// 是否要求 TLS 连接数据库（PGSSL=require）
    pub pg_ssl: bool,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 命令行导入时同时处理的文件数量
    pub max_concurrent_imports: usize,
    /// 导出 TOML 文件的目录
    pub output_folder: String,
    /// 上传结果中文本预览的字符数
    pub preview_chars: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            database_url: "postgresql://localhost:5432/iwp_database".to_string(),
            pg_ssl: false,
            max_upload_bytes: 10 * 1024 * 1024,
            max_concurrent_imports: 4,
            output_folder: "output_toml".to_string(),
            preview_chars: 200,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，存在 `.env` 时先加载它
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，缺失或无法解析的值使用默认值
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        Self {
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(default.port),
            database_url: lookup("DATABASE_URL").unwrap_or(default.database_url),
            pg_ssl: lookup("PGSSL").map(|v| v.eq_ignore_ascii_case("require")).unwrap_or(default.pg_ssl),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES").and_then(|v| v.parse().ok()).unwrap_or(default.max_upload_bytes),
            max_concurrent_imports: lookup("MAX_CONCURRENT_IMPORTS")
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.max_concurrent_imports),
            output_folder: lookup("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            preview_chars: lookup("PREVIEW_CHARS").and_then(|v| v.parse().ok()).unwrap_or(default.preview_chars),
            verbose_logging: lookup("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
