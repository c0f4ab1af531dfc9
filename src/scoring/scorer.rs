//! 评分器 - 核心算法层
//!
//! 把一段原始文本映射为 ζ（连贯性）、S（熵）和 M = ζ - S。
//! 纯函数：同一文本总是得到同一结果，没有副作用。

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Score;
use crate::scoring::keywords::KeywordTable;

/// 任何交流尝试的基础连贯性
const BASELINE_COHERENCE: f64 = 0.1;

/// 第二人称指责句式："you are X" / "you're X"
static PERSONAL_ATTACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\byou(?:\s+are|\s*['’]re)\s+\w+").expect("personal attack pattern is valid")
});

/// 评分器
///
/// 持有两张不可变的关键词表，构造后可在多个会话间共享。
#[derive(Debug, Clone)]
pub struct Scorer {
    coherence_keywords: KeywordTable,
    entropy_keywords: KeywordTable,
}

impl Scorer {
    /// 使用自定义关键词表创建评分器
    pub fn new(coherence_keywords: KeywordTable, entropy_keywords: KeywordTable) -> Self {
        Self {
            coherence_keywords,
            entropy_keywords,
        }
    }

    /// 为一段文本打分
    pub fn score(&self, text: &str) -> Score {
        let normalized = text.to_lowercase();
        let word_count = text.split_whitespace().count();

        let mut coherence = BASELINE_COHERENCE + self.coherence_keywords.weigh(&normalized);
        let mut entropy = self.entropy_keywords.weigh(&normalized);

        coherence += structure_bonus(text, word_count);
        entropy += toxicity_penalty(text, word_count);

        Score::from_components(coherence.clamp(0.0, 1.0), entropy.clamp(0.0, 1.0))
    }

    pub fn coherence_keywords(&self) -> &KeywordTable {
        &self.coherence_keywords
    }

    pub fn entropy_keywords(&self) -> &KeywordTable {
        &self.entropy_keywords
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(
            KeywordTable::default_coherence(),
            KeywordTable::default_entropy(),
        )
    }
}

/// 结构性加分（计入 ζ）
fn structure_bonus(text: &str, word_count: usize) -> f64 {
    let mut bonus = 0.0;

    // 长度适中
    if (10..=200).contains(&word_count) {
        bonus += 0.1;
    }

    if text.contains(['.', '!', '?']) {
        bonus += 0.05;
    }

    // 长文分段
    if word_count > 50 && text.contains('\n') {
        bonus += 0.1;
    }

    // 寻求理解的提问
    if text.contains('?') && word_count > 5 {
        bonus += 0.1;
    }

    bonus
}

/// 毒性惩罚（计入 S）
fn toxicity_penalty(text: &str, word_count: usize) -> f64 {
    let mut penalty = 0.0;

    // 全大写喊叫
    let total_chars = text.chars().count().max(1);
    let upper_chars = text.chars().filter(|c| c.is_uppercase()).count();
    if upper_chars as f64 / total_chars as f64 > 0.3 {
        penalty += 0.3;
    }

    // 过多的感叹号/问号
    let exclamations = text.matches('!').count();
    let questions = text.matches('?').count();
    if exclamations > 3 || questions > 3 {
        penalty += 0.2;
    }

    // 低质量回复
    if word_count < 3 {
        penalty += 0.2;
    }

    if PERSONAL_ATTACK.is_match(text) {
        penalty += 0.3;
    }

    penalty
}
