use serde::{Deserialize, Serialize};

/// 评论的连贯性评分
///
/// - `coherence` (ζ)：建设性/信息量，范围 [0, 1]
/// - `entropy` (S)：毒性/混乱度，范围 [0, 1]
/// - `moral_value` (M)：ζ - S，范围 [-1, 1]
///
/// 三个值都保留两位小数。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub coherence: f64,
    pub entropy: f64,
    pub moral_value: f64,
}

impl Score {
    /// 由已限制到 [0, 1] 的 ζ 和 S 构造评分
    pub fn from_components(coherence: f64, entropy: f64) -> Self {
        let coherence = round2(coherence);
        let entropy = round2(entropy);
        Self {
            coherence,
            entropy,
            moral_value: round2(coherence - entropy),
        }
    }

    /// 是否达到阈值
    pub fn meets(&self, threshold: f64) -> bool {
        self.moral_value >= threshold
    }

    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_moral_value(self.moral_value)
    }

    /// 徽章文本，例如 `M:0.85`
    pub fn badge_label(&self) -> String {
        format!("M:{}", self.moral_value)
    }
}

/// 评分徽章等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    /// M > 0.5
    High,
    /// 0 < M <= 0.5
    Moderate,
    /// M <= 0
    Low,
}

impl ScoreTier {
    pub fn from_moral_value(moral_value: f64) -> Self {
        if moral_value > 0.5 {
            ScoreTier::High
        } else if moral_value > 0.0 {
            ScoreTier::Moderate
        } else {
            ScoreTier::Low
        }
    }

    /// 徽章颜色
    pub fn color(self) -> &'static str {
        match self {
            ScoreTier::High => "#4CAF50",
            ScoreTier::Moderate => "#FF9800",
            ScoreTier::Low => "#F44336",
        }
    }
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_components_rounds_all_fields() {
        let score = Score::from_components(0.456, 0.123);
        assert_eq!(score.coherence, 0.46);
        assert_eq!(score.entropy, 0.12);
        assert_eq!(score.moral_value, 0.34);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ScoreTier::from_moral_value(0.51), ScoreTier::High);
        assert_eq!(ScoreTier::from_moral_value(0.5), ScoreTier::Moderate);
        assert_eq!(ScoreTier::from_moral_value(0.01), ScoreTier::Moderate);
        assert_eq!(ScoreTier::from_moral_value(0.0), ScoreTier::Low);
        assert_eq!(ScoreTier::from_moral_value(-0.9), ScoreTier::Low);
    }

    #[test]
    fn test_badge_label() {
        let score = Score::from_components(1.0, 0.15);
        assert_eq!(score.badge_label(), "M:0.85");
        assert_eq!(score.tier().color(), "#4CAF50");
    }
}
