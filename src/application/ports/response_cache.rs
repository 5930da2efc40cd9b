//! Response Cache Port - 语音应答缓存抽象
//!
//! 定义应答缓存的抽象接口，具体实现使用文件系统存储

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CacheStatsReport, SpeechRequest};

/// 缓存内部错误
///
/// 只在构造与 flush 时对外暴露；lookup/store 内部降级处理，
/// 失败的缓存与"尚未缓存"对调用方不可区分
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Response Cache Port
///
/// 以 (text, voice, speed, provider) 四元组为粒度缓存已合成的音频字节。
/// 音频内容对缓存不透明，不做格式校验。
#[async_trait]
pub trait ResponseCachePort: Send + Sync {
    /// 查询缓存音频
    ///
    /// 未命中时记录一次该文本的未命中观察（准入策略据此学习）；
    /// 命中时更新 LRU 时间戳与命中计数。
    /// 磁盘读取失败按未命中处理，不向调用方抛错。
    async fn lookup(&self, request: &SpeechRequest) -> Option<Vec<u8>>;

    /// 写入已合成的音频
    ///
    /// 先经准入策略判定，被拒绝时静默返回，调用方无需检查结果。
    ///
    /// 前置条件：同一文本的 store 应在对应的 lookup 未命中之后调用，
    /// 频率阈值依赖 lookup 留下的未命中观察才可到达。
    async fn store(&self, request: &SpeechRequest, audio: &[u8]);

    /// 预热：将一批文本的频率计数直接标记到准入阈值
    ///
    /// 本身不做合成也不做磁盘 IO，实际写入仍走 store
    async fn warm(&self, requests: &[SpeechRequest]);

    /// 清空缓存：删除所有音频文件，重置索引、频率计数与统计
    async fn clear(&self);

    /// 获取缓存统计报告
    async fn stats(&self) -> CacheStatsReport;
}
