//! 日志初始化

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认过滤规则，可被 RUST_LOG 覆盖
const DEFAULT_FILTER: &str = "info,quiz_import=info,sqlx=warn,tower_http=info";
const VERBOSE_FILTER: &str = "info,quiz_import=debug,sqlx=warn,tower_http=debug";

/// 初始化全局日志订阅者
///
/// 重复调用是安全的（测试中常见），第二次调用会被忽略
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
