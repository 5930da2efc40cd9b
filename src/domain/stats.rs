//! Cache Statistics - 缓存命中统计

use serde::{Deserialize, Serialize};

/// 累计计数器
///
/// 随快照持久化，跨进程重启累计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// 命中次数
    pub hits: u64,
    /// 未命中次数
    pub misses: u64,
    /// 完成写入次数
    pub generations: u64,
    /// 估算累计节省时间（毫秒）
    pub total_saved_ms: u64,
}

impl CacheStatistics {
    pub fn record_hit(&mut self, saved_ms: u64) {
        self.hits += 1;
        self.total_saved_ms += saved_ms;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_generation(&mut self) {
        self.generations += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 生成对外报告
    ///
    /// 缓存体积与条目数由调用方按当前索引即时求得，不单独维护副本
    pub fn report(&self, total_size_bytes: u64, cached_items: usize) -> CacheStatsReport {
        let total_requests = self.hits + self.misses;
        let hit_rate = if total_requests > 0 {
            self.hits as f64 / total_requests as f64 * 100.0
        } else {
            0.0
        };

        CacheStatsReport {
            hits: self.hits,
            misses: self.misses,
            hit_rate_percent: round_to(hit_rate, 1),
            total_saved_ms: self.total_saved_ms,
            total_saved_seconds: round_to(self.total_saved_ms as f64 / 1000.0, 1),
            cache_size_mb: round_to(total_size_bytes as f64 / (1024.0 * 1024.0), 2),
            cached_items,
        }
    }
}

/// 对外统计报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatsReport {
    pub hits: u64,
    pub misses: u64,
    /// 命中率百分比，保留 1 位小数；无请求时为 0
    pub hit_rate_percent: f64,
    pub total_saved_ms: u64,
    /// 节省秒数，保留 1 位小数
    pub total_saved_seconds: f64,
    /// 缓存体积（MB），保留 2 位小数
    pub cache_size_mb: f64,
    pub cached_items: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_is_zero_without_requests() {
        let stats = CacheStatistics::default();
        let report = stats.report(0, 0);

        assert_eq!(report.hit_rate_percent, 0.0);
        assert_eq!(report.cached_items, 0);
        assert_eq!(report.cache_size_mb, 0.0);
    }

    #[test]
    fn test_hit_rate_rounding() {
        let mut stats = CacheStatistics::default();
        stats.record_hit(950);
        stats.record_miss();
        stats.record_miss();

        // 1/3 = 33.333... -> 33.3
        let report = stats.report(0, 1);
        assert_eq!(report.hit_rate_percent, 33.3);
    }

    #[test]
    fn test_saved_time_accumulates_per_hit() {
        let mut stats = CacheStatistics::default();
        stats.record_hit(950);
        stats.record_hit(950);

        let report = stats.report(0, 1);
        assert_eq!(report.total_saved_ms, 1900);
        assert_eq!(report.total_saved_seconds, 1.9);
    }

    #[test]
    fn test_cache_size_mb_rounding() {
        let stats = CacheStatistics::default();
        // 1.5 MB
        let report = stats.report(3 * 1024 * 1024 / 2, 3);
        assert_eq!(report.cache_size_mb, 1.5);
        assert_eq!(report.cached_items, 3);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut stats = CacheStatistics::default();
        stats.record_hit(950);
        stats.record_miss();
        stats.record_generation();

        stats.reset();
        assert_eq!(stats, CacheStatistics::default());
    }
}
