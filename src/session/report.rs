//! 评论串分析报告
//!
//! 汇总一个评论串的评分：平均值、不同阈值下的保留情况、最高/最低评论，
//! 以及按 M 值排序后前 10 条评论的阅读体验。

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::models::{Item, Score};
use crate::session::stats::ScoreDistribution;
use crate::utils::logging::truncate_text;

/// 报告中比较的阈值
pub const COMPARISON_THRESHOLDS: [f64; 4] = [0.0, 0.3, 0.5, 0.7];

const EXAMPLE_COUNT: usize = 3;
const EXPERIENCE_SAMPLE: usize = 10;
const PREVIEW_CHARS: usize = 200;

/// 阅读体验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadingExperience {
    /// 平均 M < 0.3
    Chaotic,
    /// 平均 M < 0.6
    Mixed,
    Coherent,
}

impl ReadingExperience {
    pub fn from_average(average: f64) -> Self {
        if average < 0.3 {
            ReadingExperience::Chaotic
        } else if average < 0.6 {
            ReadingExperience::Mixed
        } else {
            ReadingExperience::Coherent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadingExperience::Chaotic => "😞 Chaotic",
            ReadingExperience::Mixed => "😐 Mixed",
            ReadingExperience::Coherent => "😊 Coherent",
        }
    }
}

/// 某个阈值下的保留情况
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdRow {
    pub threshold: f64,
    pub count: usize,
    pub percentage: f64,
    /// 保留评论的平均 M 值；没有保留评论时为 `None`
    pub average: Option<f64>,
}

/// 带评分的评论摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredComment {
    pub id: String,
    pub preview: String,
    pub score: Score,
}

/// 评论串报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadReport {
    pub name: String,
    pub scored: usize,
    pub average_moral_value: f64,
    pub average_coherence: f64,
    pub average_entropy: f64,
    pub thresholds: Vec<ThresholdRow>,
    pub top: Vec<ScoredComment>,
    pub bottom: Vec<ScoredComment>,
    pub distribution: ScoreDistribution,
    pub experience_average: f64,
    pub experience: ReadingExperience,
}

impl ThreadReport {
    /// 生成报告；没有任何已评分评论时返回 `None`
    pub fn build(name: &str, items: &[Item], scores: &HashMap<String, Score>) -> Option<Self> {
        let mut scored: Vec<ScoredComment> = items
            .iter()
            .filter_map(|item| {
                scores.get(&item.id).map(|score| ScoredComment {
                    id: item.id.clone(),
                    preview: truncate_text(item.text.trim(), PREVIEW_CHARS),
                    score: *score,
                })
            })
            .collect();

        if scored.is_empty() {
            return None;
        }

        let n = scored.len() as f64;
        let average_moral_value = scored.iter().map(|c| c.score.moral_value).sum::<f64>() / n;
        let average_coherence = scored.iter().map(|c| c.score.coherence).sum::<f64>() / n;
        let average_entropy = scored.iter().map(|c| c.score.entropy).sum::<f64>() / n;

        let thresholds = COMPARISON_THRESHOLDS
            .iter()
            .map(|&threshold| {
                let kept: Vec<f64> = scored
                    .iter()
                    .map(|c| c.score.moral_value)
                    .filter(|m| *m >= threshold)
                    .collect();
                ThresholdRow {
                    threshold,
                    count: kept.len(),
                    percentage: kept.len() as f64 / n * 100.0,
                    average: (!kept.is_empty())
                        .then(|| kept.iter().sum::<f64>() / kept.len() as f64),
                }
            })
            .collect();

        let distribution = ScoreDistribution::from_scores(scored.iter().map(|c| &c.score));

        // 稳定排序：M 相同时保持原顺序
        scored.sort_by(|a, b| b.score.moral_value.total_cmp(&a.score.moral_value));

        let sample = &scored[..scored.len().min(EXPERIENCE_SAMPLE)];
        let experience_average =
            sample.iter().map(|c| c.score.moral_value).sum::<f64>() / sample.len() as f64;

        let top = scored.iter().take(EXAMPLE_COUNT).cloned().collect();
        let bottom = scored[scored.len().saturating_sub(EXAMPLE_COUNT)..].to_vec();

        Some(Self {
            name: name.to_string(),
            scored: scored.len(),
            average_moral_value,
            average_coherence,
            average_entropy,
            thresholds,
            top,
            bottom,
            distribution,
            experience_average,
            experience: ReadingExperience::from_average(experience_average),
        })
    }
}

impl fmt::Display for ThreadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 评论串分析: {}", self.name)?;
        writeln!(f, "已评分评论: {}", self.scored)?;
        writeln!(f, "平均 M: {:.3}", self.average_moral_value)?;
        writeln!(f, "平均 ζ: {:.3}", self.average_coherence)?;
        writeln!(f, "平均 S: {:.3}", self.average_entropy)?;
        writeln!(
            f,
            "分布: 负 {} | 低 {} | 中 {} | 高 {}",
            self.distribution.negative,
            self.distribution.low,
            self.distribution.medium,
            self.distribution.high
        )?;

        writeln!(f, "\n🎛️ 阈值对比")?;
        writeln!(f, "{}", "-".repeat(60))?;
        for row in &self.thresholds {
            match row.average {
                Some(avg) => writeln!(
                    f,
                    "阈值 {:.1}: {:3} 条 ({:5.1}%) - 平均 M: {:.3}",
                    row.threshold, row.count, row.percentage, avg
                )?,
                None => writeln!(
                    f,
                    "阈值 {:.1}: {:3} 条 ({:5.1}%) - 平均 M: N/A",
                    row.threshold, row.count, row.percentage
                )?,
            }
        }

        writeln!(f, "\n🏆 最高连贯性评论")?;
        for (i, comment) in self.top.iter().enumerate() {
            write_comment(f, i + 1, comment)?;
        }
        writeln!(f, "\n💥 最低连贯性评论")?;
        for (i, comment) in self.bottom.iter().enumerate() {
            write_comment(f, i + 1, comment)?;
        }

        writeln!(
            f,
            "\n📖 按 M 值排序的前 {} 条: 平均 M {:.3}，阅读体验 {}",
            EXPERIENCE_SAMPLE,
            self.experience_average,
            self.experience.label()
        )
    }
}

fn write_comment(f: &mut fmt::Formatter<'_>, rank: usize, comment: &ScoredComment) -> fmt::Result {
    writeln!(
        f,
        "#{} [{}] M: {:.2} (ζ:{:.2}, S:{:.2})",
        rank, comment.id, comment.score.moral_value, comment.score.coherence, comment.score.entropy
    )?;
    writeln!(f, "    {}", comment.preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn fixture() -> (Vec<Item>, HashMap<String, Score>) {
        let values = [("a", 0.9, 0.0), ("b", 0.1, 0.6), ("c", 0.5, 0.1), ("d", 0.5, 0.0)];
        let items = values
            .iter()
            .map(|(id, _, _)| Item::new(*id, format!("comment {}", id), Position::default()))
            .collect();
        let scores = values
            .iter()
            .map(|(id, c, e)| (id.to_string(), Score::from_components(*c, *e)))
            .collect();
        (items, scores)
    }

    #[test]
    fn test_report_averages_and_thresholds() {
        let (items, scores) = fixture();
        let report = ThreadReport::build("t", &items, &scores).unwrap();

        assert_eq!(report.scored, 4);
        // M: 0.9, -0.5, 0.4, 0.5
        assert!((report.average_moral_value - 0.325).abs() < 1e-9);
        assert_eq!(report.thresholds[0].count, 3);
        assert_eq!(report.thresholds[1].count, 3);
        assert_eq!(report.thresholds[2].count, 2);
        assert_eq!(report.thresholds[3].count, 1);
        assert!((report.thresholds[0].percentage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_examples_are_sorted() {
        let (items, scores) = fixture();
        let report = ThreadReport::build("t", &items, &scores).unwrap();

        let top: Vec<&str> = report.top.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(top, vec!["a", "d", "c"]);
        let bottom: Vec<&str> = report.bottom.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(bottom, vec!["d", "c", "b"]);
        assert_eq!(report.experience, ReadingExperience::Mixed);
        assert!(report.to_string().contains("阈值 0.7"));
    }

    #[test]
    fn test_empty_report() {
        assert!(ThreadReport::build("t", &[], &HashMap::new()).is_none());
    }

    #[test]
    fn test_reading_experience_thresholds() {
        assert_eq!(ReadingExperience::from_average(0.29), ReadingExperience::Chaotic);
        assert_eq!(ReadingExperience::from_average(0.3), ReadingExperience::Mixed);
        assert_eq!(ReadingExperience::from_average(0.6), ReadingExperience::Coherent);
    }
}
