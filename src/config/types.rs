//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 缓存存储配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// 准入策略配置
    #[serde(default)]
    pub admission: AdmissionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            admission: AdmissionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 缓存存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 音频文件与元数据快照的存放目录
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// 缓存总体积上限（字节），写入超出时触发 LRU 淘汰
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,

    /// 单次命中的估算节省时间（毫秒），仅用于统计报告
    #[serde(default = "default_per_hit_saved_ms")]
    pub per_hit_saved_ms: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache/responses")
}

fn default_max_size_bytes() -> u64 {
    100 * 1024 * 1024 // 100 MB
}

fn default_per_hit_saved_ms() -> u64 {
    950
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            max_size_bytes: default_max_size_bytes(),
            per_hit_saved_ms: default_per_hit_saved_ms(),
        }
    }
}

/// 准入策略配置
///
/// 这些是调优旋钮而非结构不变量，全部可配置
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionConfig {
    /// 文本长度上限（字符数），超长文本视为一次性内容不缓存
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    /// 频率阈值：普通文本累计未命中达到该值后写入才生效
    #[serde(default = "default_frequency_threshold")]
    pub frequency_threshold: u32,

    /// 常用指令短语（子串匹配，不区分大小写），命中即无条件缓存
    #[serde(default = "default_common_phrases")]
    pub common_phrases: Vec<String>,
}

fn default_max_text_len() -> usize {
    200
}

fn default_frequency_threshold() -> u32 {
    3
}

fn default_common_phrases() -> Vec<String> {
    [
        "hardpoints deployed",
        "setting speed",
        "shields up",
        "understood",
        "cargo scoop",
        "landing gear",
        "frameshift",
        "jump complete",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_text_len: default_max_text_len(),
            frequency_threshold: default_frequency_threshold(),
            common_phrases: default_common_phrases(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
