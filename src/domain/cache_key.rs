//! Cache Key - 缓存键派生
//!
//! 将 (text, voice, speed, provider) 四元组映射为稳定的 MD5 摘要。
//! 摘要同时用作音频文件在磁盘上的文件名，因此跨进程重启的稳定性
//! 是硬性要求而非优化。

use serde::{Deserialize, Serialize};

/// 语音合成请求参数
///
/// 缓存以完整四元组为粒度：任一字段不同即视为不同条目，不做部分匹配
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    /// 要合成的文本内容
    pub text: String,
    /// TTS 音色 ID（对缓存而言是不透明字符串）
    pub voice_id: String,
    /// 语速倍率
    pub speed: f32,
    /// TTS 后端名称
    pub provider: String,
}

impl SpeechRequest {
    pub fn new(
        text: impl Into<String>,
        voice_id: impl Into<String>,
        speed: f32,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            speed,
            provider: provider.into(),
        }
    }

    /// 派生该请求对应的缓存键
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::derive(&self.text, &self.voice_id, self.speed, &self.provider)
    }
}

/// 缓存键 - 32 位十六进制 MD5 摘要
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// 从四元组派生缓存键
    ///
    /// 每个字段先写入字节长度再写入内容，字段拼接不产生歧义
    /// （"ab"+"c" 与 "a"+"bc" 得到不同摘要）
    pub fn derive(text: &str, voice_id: &str, speed: f32, provider: &str) -> Self {
        let speed_repr = speed.to_string();

        let mut ctx = md5::Context::new();
        for field in [text, voice_id, speed_repr.as_str(), provider] {
            ctx.consume((field.len() as u64).to_le_bytes());
            ctx.consume(field.as_bytes());
        }

        Self(format!("{:x}", ctx.compute()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        let a = CacheKey::derive("Shields up", "nova", 1.0, "openai");
        let b = CacheKey::derive("Shields up", "nova", 1.0, "openai");
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_changes_with_any_field() {
        let base = CacheKey::derive("Shields up", "nova", 1.0, "openai");

        assert_ne!(base, CacheKey::derive("Shields down", "nova", 1.0, "openai"));
        assert_ne!(base, CacheKey::derive("Shields up", "alloy", 1.0, "openai"));
        assert_ne!(base, CacheKey::derive("Shields up", "nova", 1.5, "openai"));
        assert_ne!(base, CacheKey::derive("Shields up", "nova", 1.0, "edge"));
    }

    #[test]
    fn test_key_fields_do_not_bleed_into_each_other() {
        // 无长度前缀时这两组会拼接出相同的输入
        let a = CacheKey::derive("ab", "c", 1.0, "p");
        let b = CacheKey::derive("a", "bc", 1.0, "p");
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_is_fixed_width_hex() {
        let key = CacheKey::derive("Hardpoints deployed", "nova", 1.2, "openai");
        assert_eq!(key.as_str().len(), 32);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_request_cache_key_matches_derive() {
        let request = SpeechRequest::new("Jump complete", "nova", 1.0, "openai");
        assert_eq!(
            request.cache_key(),
            CacheKey::derive("Jump complete", "nova", 1.0, "openai")
        );
    }
}
