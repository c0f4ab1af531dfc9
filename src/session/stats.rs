use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Item, Score};
use crate::visibility::Decisions;

/// 会话统计（控制面板上的数字）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionStats {
    /// 评论总数
    pub total: usize,
    /// 可见评论数
    pub visible: usize,
    /// 已评分评论数
    pub processed: usize,
    /// 被提升的评论数
    pub lifted: usize,
    /// 已评分评论的平均 M 值
    pub average_moral_value: f64,
}

impl SessionStats {
    /// 根据当前评论、评分缓存和决策计算统计
    ///
    /// 没有决策的评论按可见计算。
    pub fn compute(items: &[Item], scores: &HashMap<String, Score>, decisions: &Decisions) -> Self {
        let mut stats = SessionStats {
            total: items.len(),
            ..Default::default()
        };
        let mut moral_sum = 0.0;

        for item in items {
            match decisions.get(&item.id) {
                Some(decision) => {
                    if decision.visible {
                        stats.visible += 1;
                    }
                    if decision.is_lifted() {
                        stats.lifted += 1;
                    }
                }
                None => stats.visible += 1,
            }
            if let Some(score) = scores.get(&item.id) {
                stats.processed += 1;
                moral_sum += score.moral_value;
            }
        }

        if stats.processed > 0 {
            stats.average_moral_value = moral_sum / stats.processed as f64;
        }
        stats
    }
}

/// 评分分布（调试报告用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    /// M < 0
    pub negative: usize,
    /// 0 <= M < 0.3
    pub low: usize,
    /// 0.3 <= M < 0.6
    pub medium: usize,
    /// M >= 0.6
    pub high: usize,
}

impl ScoreDistribution {
    pub fn from_scores<'a>(scores: impl IntoIterator<Item = &'a Score>) -> Self {
        let mut dist = Self::default();
        for score in scores {
            match score.moral_value {
                m if m < 0.0 => dist.negative += 1,
                m if m < 0.3 => dist.low += 1,
                m if m < 0.6 => dist.medium += 1,
                _ => dist.high += 1,
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.negative + self.low + self.medium + self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, VisibilityDecision};

    #[test]
    fn test_compute_stats() {
        let items: Vec<Item> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| Item::new(*id, "", Position::default()))
            .collect();
        let scores = HashMap::from([
            ("a".to_string(), Score::from_components(0.8, 0.0)),
            ("b".to_string(), Score::from_components(0.0, 0.4)),
            ("c".to_string(), Score::from_components(0.6, 0.0)),
        ]);
        let decisions = Decisions::from([
            ("a".to_string(), VisibilityDecision::shown()),
            ("b".to_string(), VisibilityDecision::hidden()),
            ("c".to_string(), VisibilityDecision::lifted(1)),
        ]);

        let stats = SessionStats::compute(&items, &scores, &decisions);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.visible, 3);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.lifted, 1);
        assert!((stats.average_moral_value - (1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_distribution_buckets() {
        let scores = [
            Score::from_components(0.0, 0.5),
            Score::from_components(0.0, 0.0),
            Score::from_components(0.3, 0.0),
            Score::from_components(0.59, 0.0),
            Score::from_components(0.6, 0.0),
        ];
        let dist = ScoreDistribution::from_scores(&scores);
        assert_eq!(
            dist,
            ScoreDistribution {
                negative: 1,
                low: 1,
                medium: 2,
                high: 1
            }
        );
        assert_eq!(dist.total(), 5);
    }
}
