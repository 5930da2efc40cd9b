//! Vocache - 语音应答缓存
//!
//! 为语音应答流水线缓存已合成的 TTS 音频：以 (text, voice, speed,
//! provider) 四元组为键，重复短语跳过合成直接回放。缓存是纯优化层，
//! 损坏或禁用的缓存与"尚未缓存"在行为上不可区分。
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - CacheKey: 四元组的确定性 MD5 摘要，同时决定音频文件名
//! - AdmissionPolicy + FrequencyCounter: 频率驱动的准入策略
//! - CacheStatistics: 命中统计与报告
//!
//! 应用层 (application/):
//! - Ports: ResponseCachePort 端口定义
//!
//! 基础设施层 (infrastructure/):
//! - Persistence: 文件系统存储（裸音频文件 + JSON 元数据快照，
//!   LRU 淘汰，崩溃自愈）

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::ports::{CacheError, ResponseCachePort};
pub use config::{load_config, AppConfig};
pub use domain::{CacheKey, CacheStatsReport, SpeechRequest};
pub use infrastructure::FileResponseCache;
