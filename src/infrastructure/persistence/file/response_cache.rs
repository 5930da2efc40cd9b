//! File Response Cache - 文件系统应答缓存实现
//!
//! 音频以 `<key>.pcm` 裸字节文件存放在缓存目录内，元数据集中在单个
//! JSON 快照。索引、频率计数与统计由同一把互斥锁保护，每个逻辑操作
//! 全程持锁，淘汰与写入不会交错破坏体积核算。

use chrono::Utc;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{CacheError, ResponseCachePort};
use crate::config::{AdmissionConfig, CacheConfig};
use crate::domain::{
    AdmissionPolicy, CacheKey, CacheStatistics, CacheStatsReport, FrequencyCounter, SpeechRequest,
};

use super::snapshot::{self, CacheEntry, CacheSnapshot, SNAPSHOT_FILE};

/// 文本预览截断长度（字符）
const TEXT_PREVIEW_LEN: usize = 100;

/// 互斥锁保护的可变状态
#[derive(Debug, Default)]
struct CacheState {
    index: HashMap<CacheKey, CacheEntry>,
    frequency: FrequencyCounter,
    stats: CacheStatistics,
}

impl CacheState {
    /// 当前缓存总字节数
    ///
    /// 以索引为唯一事实来源，即时求和，不维护会漂移的副本
    fn total_size_bytes(&self) -> u64 {
        self.index.values().map(|e| e.size_bytes).sum()
    }
}

/// 文件系统应答缓存
pub struct FileResponseCache {
    cache_dir: PathBuf,
    max_size_bytes: u64,
    per_hit_saved_ms: u64,
    policy: AdmissionPolicy,
    state: Mutex<CacheState>,
}

impl FileResponseCache {
    /// 创建缓存实例
    ///
    /// 确保缓存目录存在并加载既有快照；快照缺失或损坏时以空状态启动
    pub async fn new(cache: &CacheConfig, admission: &AdmissionConfig) -> Result<Self, CacheError> {
        fs::create_dir_all(&cache.cache_dir)
            .await
            .map_err(|e| CacheError::Io(e.to_string()))?;

        let loaded = snapshot::load(&cache.cache_dir.join(SNAPSHOT_FILE)).await;
        let state = CacheState {
            index: loaded.entries,
            frequency: loaded.frequency,
            stats: loaded.stats,
        };

        tracing::info!(
            cache_dir = %cache.cache_dir.display(),
            max_size_bytes = cache.max_size_bytes,
            items = state.index.len(),
            "Response cache loaded"
        );

        Ok(Self {
            cache_dir: cache.cache_dir.clone(),
            max_size_bytes: cache.max_size_bytes,
            per_hit_saved_ms: cache.per_hit_saved_ms,
            policy: AdmissionPolicy::new(
                admission.max_text_len,
                admission.frequency_threshold,
                &admission.common_phrases,
            ),
            state: Mutex::new(state),
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 缓存键对应的音频文件路径
    pub fn blob_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{}.pcm", key))
    }

    /// 将内存状态强制刷盘（进程退出前调用）
    pub async fn flush(&self) -> Result<(), CacheError> {
        let state = self.state.lock().await;
        self.persist(&state).await
    }

    /// 将当前状态写入快照文件
    async fn persist(&self, state: &CacheState) -> Result<(), CacheError> {
        let snapshot = CacheSnapshot {
            entries: state.index.clone(),
            stats: state.stats.clone(),
            frequency: state.frequency.clone(),
        };
        snapshot::save(&self.cache_dir.join(SNAPSHOT_FILE), &snapshot).await
    }

    /// 尝试写入，任何失败抛给 store 统一记录
    async fn try_store(&self, request: &SpeechRequest, audio: &[u8]) -> Result<(), CacheError> {
        let mut state = self.state.lock().await;

        if !self.policy.should_admit(&request.text, &state.frequency) {
            return Ok(());
        }

        let size_bytes = audio.len() as u64;
        if state.total_size_bytes() + size_bytes > self.max_size_bytes {
            self.evict_lru(&mut state).await;
        }

        let key = request.cache_key();

        // 音频落盘失败不得留下索引条目
        fs::write(self.blob_path(&key), audio)
            .await
            .map_err(|e| CacheError::Io(e.to_string()))?;

        let now = Utc::now().timestamp_millis();
        state.index.insert(
            key.clone(),
            CacheEntry {
                key: key.clone(),
                text_preview: truncate_chars(&request.text, TEXT_PREVIEW_LEN),
                voice_id: request.voice_id.clone(),
                speed: request.speed,
                provider: request.provider.clone(),
                size_bytes,
                hit_count: 1,
                created_at: now,
                last_used_at: now,
                file_name: format!("{}.pcm", key),
            },
        );
        state.stats.record_generation();

        self.persist(&state).await?;

        tracing::debug!(
            key = %key,
            size_bytes,
            preview = %truncate_chars(&request.text, 50),
            "Audio cached"
        );

        Ok(())
    }

    /// LRU 淘汰
    ///
    /// 按 last_used_at 升序移除最旧的 ⌈n/5⌉ 个条目。
    /// 音频文件删除失败仅记录日志，条目仍会移出索引，
    /// 坏路径不会造成反复重试。
    async fn evict_lru(&self, state: &mut CacheState) {
        if state.index.is_empty() {
            return;
        }

        let mut items: Vec<(CacheKey, i64)> = state
            .index
            .iter()
            .map(|(key, entry)| (key.clone(), entry.last_used_at))
            .collect();
        items.sort_by_key(|(_, last_used_at)| *last_used_at);

        let evict_count = items.len().div_ceil(5);

        for (key, _) in items.into_iter().take(evict_count) {
            if let Some(entry) = state.index.remove(&key) {
                let path = self.cache_dir.join(&entry.file_name);
                if let Err(e) = fs::remove_file(&path).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(key = %key, error = %e, "Failed to delete evicted audio file");
                    }
                }
                tracing::debug!(
                    key = %key,
                    preview = %entry.text_preview,
                    "Cache entry evicted"
                );
            }
        }

        if let Err(e) = self.persist(state).await {
            tracing::error!(error = %e, "Failed to persist snapshot after eviction");
        }
    }
}

#[async_trait]
impl ResponseCachePort for FileResponseCache {
    async fn lookup(&self, request: &SpeechRequest) -> Option<Vec<u8>> {
        let key = request.cache_key();
        let mut state = self.state.lock().await;

        if !state.index.contains_key(&key) {
            state.stats.record_miss();
            // 未命中观察供准入策略学习
            state.frequency.observe_miss(&request.text);
            return None;
        }

        match fs::read(self.blob_path(&key)).await {
            Ok(audio) => {
                if let Some(entry) = state.index.get_mut(&key) {
                    entry.hit_count += 1;
                    entry.last_used_at = Utc::now().timestamp_millis();
                }
                state.stats.record_hit(self.per_hit_saved_ms);

                tracing::debug!(
                    key = %key,
                    saved_ms = self.per_hit_saved_ms,
                    preview = %truncate_chars(&request.text, 50),
                    "Cache hit"
                );
                Some(audio)
            }
            Err(e) => {
                // 索引指向的音频文件缺失或不可读：清除过期条目并按未命中处理
                tracing::warn!(key = %key, error = %e, "Cached audio unreadable, purging stale entry");
                state.index.remove(&key);
                state.stats.record_miss();
                None
            }
        }
    }

    async fn store(&self, request: &SpeechRequest, audio: &[u8]) {
        if let Err(e) = self.try_store(request, audio).await {
            tracing::error!(error = %e, "Failed to cache audio");
        }
    }

    async fn warm(&self, requests: &[SpeechRequest]) {
        let mut state = self.state.lock().await;
        for request in requests {
            state.frequency.mark(&request.text, self.policy.warm_count());
        }
        tracing::info!(count = requests.len(), "Response cache warmed");
    }

    async fn clear(&self) {
        let mut state = self.state.lock().await;

        for entry in state.index.values() {
            let path = self.cache_dir.join(&entry.file_name);
            if let Err(e) = fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(file = %path.display(), error = %e, "Failed to delete cached audio file");
                }
            }
        }

        state.index.clear();
        state.frequency.clear();
        state.stats.reset();

        if let Err(e) = self.persist(&state).await {
            tracing::error!(error = %e, "Failed to persist snapshot after clear");
        }

        tracing::info!("Response cache cleared");
    }

    async fn stats(&self) -> CacheStatsReport {
        let state = self.state.lock().await;
        state.stats.report(state.total_size_bytes(), state.index.len())
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
