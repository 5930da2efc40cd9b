//! 常用指令应答短语
//!
//! 交互中高频出现的舰载指令确认语，供宿主在启动时预热缓存

use super::cache_key::SpeechRequest;

/// 高频指令应答文本
pub const COMMON_ACTION_TEXTS: &[&str] = &[
    // 武器
    "Hardpoints deployed",
    "Hardpoints deployed, Commander",
    "Hardpoints retracted",
    // 速度
    "Setting speed to zero",
    "Setting speed to 50 percent",
    "Setting speed to 75 percent",
    "Setting speed to 100 percent",
    // 护盾
    "Shields up",
    "Shield cell bank deployed",
    // 货舱
    "Cargo scoop deployed",
    "Cargo scoop retracted",
    // 起落架
    "Landing gear down",
    "Landing gear up",
    // 跃迁
    "Frameshift drive charging",
    "Jump complete",
    "Hyperspace jump complete",
    // 灯光
    "Lights on",
    "Lights off",
    // 通用应答
    "Understood",
    "Affirmative",
    "Copy that",
    "Negative",
];

/// 以统一的音色/语速/后端构造预热请求列表
pub fn common_action_responses(voice_id: &str, speed: f32, provider: &str) -> Vec<SpeechRequest> {
    COMMON_ACTION_TEXTS
        .iter()
        .map(|text| SpeechRequest::new(*text, voice_id, speed, provider))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_action_responses_carry_settings() {
        let requests = common_action_responses("nova", 1.0, "openai");

        assert_eq!(requests.len(), COMMON_ACTION_TEXTS.len());
        assert!(requests
            .iter()
            .all(|r| r.voice_id == "nova" && r.speed == 1.0 && r.provider == "openai"));
        assert!(requests.iter().any(|r| r.text == "Shields up"));
    }
}
