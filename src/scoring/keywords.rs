//! 关键词权重表
//!
//! 关键词表是配置数据而不是逻辑：内置表用 `phf` 静态表描述，
//! 也可以通过 TOML 文件整体替换（见 [`KeywordFile`]）。

use std::collections::BTreeMap;

use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::KeywordError;

/// 连贯性指标（促进理解）
static COHERENCE_KEYWORDS: phf::Map<&'static str, f64> = phf_map! {
    "evidence" => 0.3, "source" => 0.3, "study" => 0.3, "research" => 0.3,
    "data" => 0.2, "fact" => 0.2, "analysis" => 0.2, "nuanced" => 0.3,
    "complex" => 0.2, "context" => 0.3, "perspective" => 0.2,
    "understand" => 0.2, "clarify" => 0.3, "explain" => 0.2,
    "constructive" => 0.3, "thoughtful" => 0.3, "reasonable" => 0.2,
    "consider" => 0.2, "acknowledge" => 0.2, "fair point" => 0.3,
    "interesting" => 0.15, "informative" => 0.25, "helpful" => 0.25,
    "appreciate" => 0.2, "learn" => 0.2, "question" => 0.15,
};

/// 熵指标（制造混乱/冲突）
static ENTROPY_KEYWORDS: phf::Map<&'static str, f64> = phf_map! {
    "stupid" => 0.4, "idiot" => 0.5, "moron" => 0.5, "dumb" => 0.4,
    "pathetic" => 0.3, "disgusting" => 0.4, "garbage" => 0.3,
    "bullshit" => 0.3, "lies" => 0.4, "fake" => 0.3, "propaganda" => 0.4,
    "conspiracy" => 0.4, "sheep" => 0.4, "brainwashed" => 0.5,
    "wake up" => 0.3, "obvious" => 0.2, "anyone with a brain" => 0.4,
    "clearly you" => 0.3, "imagine being" => 0.3, "cope" => 0.3,
    "seething" => 0.4, "triggered" => 0.3, "rent free" => 0.3,
    "cringe" => 0.3, "cope harder" => 0.4, "delusional" => 0.4,
};

/// 不可变的关键词 → 权重表
///
/// 关键词在构造时统一转为小写并按字典序排列，保证累加顺序固定。
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    entries: Vec<(String, f64)>,
}

impl KeywordTable {
    /// 从任意 (关键词, 权重) 序列构造
    ///
    /// 关键词不能为空，权重必须是正的有限数；重复关键词以最后一次为准。
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, KeywordError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (keyword, weight) in pairs {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return Err(KeywordError::EmptyKeyword);
            }
            if !weight.is_finite() || weight <= 0.0 {
                return Err(KeywordError::InvalidWeight { keyword, weight });
            }
            map.insert(keyword, weight);
        }
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }

    /// 内置连贯性关键词表
    pub fn default_coherence() -> Self {
        Self::from_static(&COHERENCE_KEYWORDS)
    }

    /// 内置熵关键词表
    pub fn default_entropy() -> Self {
        Self::from_static(&ENTROPY_KEYWORDS)
    }

    fn from_static(map: &phf::Map<&'static str, f64>) -> Self {
        let mut entries: Vec<(String, f64)> =
            map.entries().map(|(k, w)| (k.to_string(), *w)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    /// 对已小写的文本累加所有出现过的关键词权重（每个关键词最多计一次）
    pub fn weigh(&self, normalized_text: &str) -> f64 {
        self.entries
            .iter()
            .filter(|(keyword, _)| normalized_text.contains(keyword.as_str()))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// 文本命中的关键词
    pub fn matches<'a>(&'a self, normalized_text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(keyword, _)| normalized_text.contains(keyword.as_str()))
            .map(|(keyword, _)| keyword.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 关键词表 TOML 文件
///
/// ```toml
/// [coherence]
/// evidence = 0.3
///
/// [entropy]
/// idiot = 0.5
/// ```
///
/// 缺省的段落回退到内置表。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordFile {
    #[serde(default)]
    pub coherence: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub entropy: Option<BTreeMap<String, f64>>,
}

impl KeywordFile {
    /// 转换为 (连贯性表, 熵表)
    pub fn into_tables(self) -> Result<(KeywordTable, KeywordTable), KeywordError> {
        let coherence = match self.coherence {
            Some(map) => KeywordTable::from_pairs(map)?,
            None => KeywordTable::default_coherence(),
        };
        let entropy = match self.entropy {
            Some(map) => KeywordTable::from_pairs(map)?,
            None => KeywordTable::default_entropy(),
        };
        Ok((coherence, entropy))
    }
}
