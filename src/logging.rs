//! Logging - tracing 订阅器初始化
//!
//! 由宿主进程在启动时调用一次

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// 初始化全局日志订阅器
///
/// 优先使用 RUST_LOG 环境变量，否则按配置级别过滤
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
