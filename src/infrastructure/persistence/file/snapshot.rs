//! Cache Snapshot - 元数据持久化
//!
//! 单个 JSON 快照文件保存三部分状态：条目索引、累计统计、频率计数。
//! 写入采用临时文件 + rename，崩溃不会留下截断的快照。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::application::ports::CacheError;
use crate::domain::{CacheKey, CacheStatistics, FrequencyCounter};

/// 快照文件名（位于缓存目录内）
pub const SNAPSHOT_FILE: &str = "metadata.json";

/// 单个缓存条目的元数据
///
/// 不变量：索引中的每个条目都有对应可读的音频文件；
/// 发现文件缺失时条目会被立即清除（lookup 自愈），不会被继续提供
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// 缓存键，同时决定音频文件名
    pub key: CacheKey,
    /// 原始文本截断预览，仅用于诊断，不参与查找
    pub text_preview: String,
    /// 音色 ID
    pub voice_id: String,
    /// 语速倍率
    pub speed: f32,
    /// TTS 后端名称
    pub provider: String,
    /// 音频字节数
    pub size_bytes: u64,
    /// 命中次数，创建即为 1
    pub hit_count: u64,
    /// 创建时间（unix 毫秒）
    pub created_at: i64,
    /// 最近使用时间（unix 毫秒），LRU 淘汰依据
    pub last_used_at: i64,
    /// 音频文件名（相对缓存目录）
    pub file_name: String,
}

/// 快照文件内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// 条目索引
    #[serde(default)]
    pub entries: HashMap<CacheKey, CacheEntry>,
    /// 累计统计
    #[serde(default)]
    pub stats: CacheStatistics,
    /// 频率计数
    #[serde(default)]
    pub frequency: FrequencyCounter,
}

/// 从磁盘加载快照
///
/// 文件不存在按空状态处理；文件损坏记录错误后同样退回空状态。
/// 启动永不因快照失败而中止。
pub async fn load(path: &Path) -> CacheSnapshot {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return CacheSnapshot::default();
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read cache snapshot, starting empty");
            return CacheSnapshot::default();
        }
    };

    match serde_json::from_slice(&data) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to parse cache snapshot, starting empty");
            CacheSnapshot::default()
        }
    }
}

/// 将快照写入磁盘
///
/// 先写临时文件再 rename 到位
pub async fn save(path: &Path, snapshot: &CacheSnapshot) -> Result<(), CacheError> {
    let data = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| CacheError::Serialization(e.to_string()))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &data)
        .await
        .map_err(|e| CacheError::Io(e.to_string()))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| CacheError::Io(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_entry(key: CacheKey) -> CacheEntry {
        CacheEntry {
            key: key.clone(),
            text_preview: "Shields up".to_string(),
            voice_id: "nova".to_string(),
            speed: 1.0,
            provider: "openai".to_string(),
            size_bytes: 5,
            hit_count: 1,
            created_at: 1_700_000_000_000,
            last_used_at: 1_700_000_000_000,
            file_name: format!("{}.pcm", key),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_empty() {
        let dir = tempdir().unwrap();
        let snapshot = load(&dir.path().join(SNAPSHOT_FILE)).await;

        assert!(snapshot.entries.is_empty());
        assert!(snapshot.frequency.is_empty());
        assert_eq!(snapshot.stats, CacheStatistics::default());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_returns_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        fs::write(&path, b"{ not valid json").await.unwrap();

        let snapshot = load(&path).await;
        assert!(snapshot.entries.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);

        let key = CacheKey::derive("Shields up", "nova", 1.0, "openai");
        let mut snapshot = CacheSnapshot::default();
        snapshot.entries.insert(key.clone(), sample_entry(key.clone()));
        snapshot.stats.record_miss();
        snapshot.stats.record_generation();
        snapshot.frequency.observe_miss("Shields up");

        save(&path, &snapshot).await.unwrap();
        let loaded = load(&path).await;

        assert_eq!(loaded.entries.len(), 1);
        assert_eq!(loaded.entries[&key].text_preview, "Shields up");
        assert_eq!(loaded.stats, snapshot.stats);
        assert_eq!(loaded.frequency.count("Shields up"), 1);

        // rename 完成后不应留下临时文件
        assert!(!path.with_extension("json.tmp").exists());
    }
}
