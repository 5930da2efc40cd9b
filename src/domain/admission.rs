//! Admission Policy - 缓存准入策略
//!
//! 写入时决定一段文本是否值得持久化：
//! 1. 超长文本视为一次性内容，拒绝
//! 2. 命中常用指令短语（子串匹配）无条件接受
//! 3. 其余文本需要累计足够次数的未命中观察才接受

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 未命中频率计数器
///
/// 以原始文本为键，忽略音色/语速/后端差异，用于学习哪些文本反复出现。
/// 每次索引未命中递增一次，命中不递增。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyCounter {
    counts: HashMap<String, u32>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次未命中观察
    pub fn observe_miss(&mut self, text: &str) {
        *self.counts.entry(text.to_string()).or_insert(0) += 1;
    }

    /// 查询文本的累计未命中次数
    pub fn count(&self, text: &str) -> u32 {
        self.counts.get(text).copied().unwrap_or(0)
    }

    /// 将文本计数直接标记到指定值（缓存预热用）
    pub fn mark(&mut self, text: &str, count: u32) {
        self.counts.insert(text.to_string(), count);
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// 准入策略
///
/// 只在写入时求值；规则按序生效，前一条命中即返回
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    max_text_len: usize,
    frequency_threshold: u32,
    common_phrases: Vec<String>,
}

impl AdmissionPolicy {
    pub fn new(max_text_len: usize, frequency_threshold: u32, common_phrases: &[String]) -> Self {
        Self {
            max_text_len,
            frequency_threshold,
            // 短语匹配不区分大小写，构造时统一转小写
            common_phrases: common_phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// 判断文本是否应当写入缓存
    pub fn should_admit(&self, text: &str, frequency: &FrequencyCounter) -> bool {
        // 超长文本视为一次性内容
        if text.chars().count() > self.max_text_len {
            return false;
        }

        // 常用指令短语无条件缓存（子串匹配）
        let text_lower = text.to_lowercase();
        if self
            .common_phrases
            .iter()
            .any(|phrase| text_lower.contains(phrase.as_str()))
        {
            return true;
        }

        // 反复未命中的文本才值得缓存
        frequency.count(text) >= self.frequency_threshold
    }

    /// 预热标记所用的计数值
    pub fn warm_count(&self) -> u32 {
        self.frequency_threshold
    }
}
