//! 可见性引擎 - 核心算法层
//!
//! 根据评分、层级和阈值决定每条评论是否可见，并标记"递归连贯性提升"：
//! 自身达标、但祖先链上连续若干层低于阈值的评论会被标注为已提升，
//! 提升深度就是被埋没的祖先层数。引擎只计算标记，不移动评论。

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::hierarchy::Hierarchy;
use crate::models::{Item, Score, VisibilityDecision};

/// 评论 ID → 可见性决策
pub type Decisions = HashMap<String, VisibilityDecision>;

/// 可见性引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityEngine;

impl VisibilityEngine {
    pub fn new() -> Self {
        Self
    }

    /// 为当前评论集合计算可见性
    ///
    /// 只为 `items` 中的评论出决策；缓存中已不存在的评论的评分或父子关系不会被采用。
    pub fn decide(
        &self,
        items: &[Item],
        scores: &HashMap<String, Score>,
        hierarchy: &Hierarchy,
        threshold: f64,
        recursive_lift: bool,
    ) -> Decisions {
        let known: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let mut decisions = Decisions::with_capacity(items.len());
        let mut hidden = 0usize;
        let mut lifted = 0usize;

        for item in items {
            let decision = match scores.get(&item.id) {
                // 未评分的评论默认可见
                None => VisibilityDecision::shown(),
                Some(score) if !score.meets(threshold) => {
                    hidden += 1;
                    VisibilityDecision::hidden()
                }
                Some(score) if recursive_lift => {
                    let depth = self.burial_depth(&item.id, scores, hierarchy, threshold, &known);
                    if depth > 0 {
                        lifted += 1;
                        debug!(
                            "🚀 评论 {} (M:{}) 从 {} 层埋没中被提升",
                            item.id, score.moral_value, depth
                        );
                        VisibilityDecision::lifted(depth)
                    } else {
                        VisibilityDecision::shown()
                    }
                }
                Some(_) => VisibilityDecision::shown(),
            };
            decisions.insert(item.id.clone(), decision);
        }

        info!(
            "🔍 阈值 {}: 隐藏 {} / {} 条评论，提升 {} 条",
            threshold,
            hidden,
            items.len(),
            lifted
        );
        decisions
    }

    /// 沿父链统计连续低于阈值的祖先层数
    ///
    /// 遇到未评分的父评论、达标的父评论、根评论或不在当前集合中的父评论时停止。
    /// 显式父 ID 可能成环：访问过的节点再次出现时立即停止，已统计的层数保留。
    pub fn burial_depth(
        &self,
        id: &str,
        scores: &HashMap<String, Score>,
        hierarchy: &Hierarchy,
        threshold: f64,
        known: &HashSet<&str>,
    ) -> usize {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(id);

        let mut depth = 0;
        let mut current = id;

        while let Some(parent) = hierarchy.parent_of(current) {
            if !known.contains(parent) {
                break;
            }
            if !visited.insert(parent) {
                warn!("⚠️ 评论 {} 的祖先链存在环 (在 {} 处)，停止回溯", id, parent);
                break;
            }
            match scores.get(parent) {
                Some(parent_score) if !parent_score.meets(threshold) => {
                    depth += 1;
                    current = parent;
                }
                _ => break,
            }
        }

        depth
    }
}
