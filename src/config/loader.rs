//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOCACHE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOCACHE_CACHE__CACHE_DIR=/data/responses`
/// - `VOCACHE_CACHE__MAX_SIZE_BYTES=52428800`
/// - `VOCACHE_ADMISSION__FREQUENCY_THRESHOLD=5`
/// - `VOCACHE_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("cache.cache_dir", "cache/responses")?
        .set_default("cache.max_size_bytes", 100_u64 * 1024 * 1024)?
        .set_default("cache.per_hit_saved_ms", 950)?
        .set_default("admission.max_text_len", 200)?
        .set_default("admission.frequency_threshold", 3)?
        .set_default(
            "admission.common_phrases",
            vec![
                "hardpoints deployed",
                "setting speed",
                "shields up",
                "understood",
                "cargo scoop",
                "landing gear",
                "frameshift",
                "jump complete",
            ],
        )?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: VOCACHE_
    // 层级分隔符: __ (双下划线)
    // 例如: VOCACHE_CACHE__MAX_SIZE_BYTES=52428800
    builder = builder.add_source(
        Environment::with_prefix("VOCACHE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证缓存目录
    if config.cache.cache_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Cache directory cannot be empty".to_string(),
        ));
    }

    // 验证体积上限
    if config.cache.max_size_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Cache max size cannot be 0".to_string(),
        ));
    }

    // 验证准入参数
    if config.admission.max_text_len == 0 {
        return Err(ConfigError::ValidationError(
            "Admission max text length cannot be 0".to_string(),
        ));
    }
    if config.admission.frequency_threshold == 0 {
        return Err(ConfigError::ValidationError(
            "Admission frequency threshold cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Response Cache Configuration ===");
    tracing::info!("Cache Directory: {:?}", config.cache.cache_dir);
    tracing::info!("Max Size: {} bytes", config.cache.max_size_bytes);
    tracing::info!("Per-hit Savings: {}ms", config.cache.per_hit_saved_ms);
    tracing::info!("Max Text Length: {} chars", config.admission.max_text_len);
    tracing::info!(
        "Frequency Threshold: {}",
        config.admission.frequency_threshold
    );
    tracing::info!(
        "Common Phrases: {}",
        config.admission.common_phrases.len()
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("====================================");
}
