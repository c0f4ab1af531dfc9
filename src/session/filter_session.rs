//! 过滤会话 - 流程层
//!
//! 核心职责：持有一次过滤会话的全部状态（阈值、提升开关、评分缓存、层级缓存），
//! 并按外部事件驱动 评分 → 层级 → 可见性 的流程。
//!
//! 状态机：
//! - `Inactive`：不评分、不过滤
//! - `Active`：评分开启，阈值过滤实时生效
//!
//! 阈值和提升开关的变化只重新运行可见性引擎，不会重新评分或重建层级。

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn, Level};

use crate::config::{clamp_threshold, Config};
use crate::hierarchy::{Hierarchy, HierarchyBuilder};
use crate::models::{Item, Score, VisibilityDecision};
use crate::presentation::PresentationAdapter;
use crate::scoring::Scorer;
use crate::session::stats::{ScoreDistribution, SessionStats};
use crate::utils::logging::truncate_text;
use crate::visibility::{Decisions, VisibilityEngine};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Inactive,
    Active,
}

/// 过滤会话
pub struct FilterSession {
    scorer: Scorer,
    builder: HierarchyBuilder,
    engine: VisibilityEngine,
    threshold: f64,
    recursive_lift: bool,
    min_scored_chars: usize,
    state: SessionState,
    scores: HashMap<String, Score>,
    hierarchy: Hierarchy,
    /// 上次构建层级时的评论 ID（按显示顺序）
    hierarchy_ids: Vec<String>,
    decisions: Decisions,
    last_stats: Option<SessionStats>,
}

impl FilterSession {
    /// 创建新的过滤会话
    ///
    /// `config.active` 为真时会话直接处于 `Active`，调用方随后用 [`Self::process_all`] 完成首次处理。
    pub fn new(scorer: Scorer, config: &Config) -> Self {
        Self {
            scorer,
            builder: HierarchyBuilder::new(),
            engine: VisibilityEngine::new(),
            threshold: clamp_threshold(config.threshold),
            recursive_lift: config.recursive_lift_enabled,
            min_scored_chars: config.min_scored_chars,
            state: if config.active {
                SessionState::Active
            } else {
                SessionState::Inactive
            },
            scores: HashMap::new(),
            hierarchy: Hierarchy::new(),
            hierarchy_ids: Vec::new(),
            decisions: Decisions::new(),
            last_stats: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn recursive_lift_enabled(&self) -> bool {
        self.recursive_lift
    }

    pub fn scores(&self) -> &HashMap<String, Score> {
        &self.scores
    }

    pub fn score_of(&self, id: &str) -> Option<&Score> {
        self.scores.get(id)
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn decisions(&self) -> &Decisions {
        &self.decisions
    }

    /// 某条评论的决策；未知评论按"无数据"处理（可见、未提升）
    pub fn decision(&self, id: &str) -> VisibilityDecision {
        self.decisions.get(id).copied().unwrap_or_default()
    }

    /// 最近一次过滤的统计
    pub fn stats(&self) -> Option<&SessionStats> {
        self.last_stats.as_ref()
    }

    /// 激活过滤：评分所有评论并应用阈值
    pub fn activate(&mut self, adapter: &mut dyn PresentationAdapter) -> SessionStats {
        if !self.is_active() {
            info!("🔍 过滤已激活 - 开始处理评论");
            self.state = SessionState::Active;
            // 关闭时徽章已被移除，缓存中的评分不会再次触发渲染
            self.restore_badges(adapter);
        }
        self.process_all(adapter)
    }

    /// 关闭过滤：恢复全部可见并移除装饰，评分缓存保留
    pub fn deactivate(&mut self, adapter: &mut dyn PresentationAdapter) {
        if !self.is_active() {
            return;
        }
        info!("❌ 过滤已关闭");
        self.state = SessionState::Inactive;
        self.decisions.clear();
        self.last_stats = None;
        adapter.reset();
    }

    /// 修改阈值；仅在 `Active` 时重新过滤
    pub fn set_threshold(
        &mut self,
        threshold: f64,
        adapter: &mut dyn PresentationAdapter,
    ) -> Option<SessionStats> {
        self.threshold = clamp_threshold(threshold);
        if !self.is_active() {
            return None;
        }
        info!("🎛️ 阈值调整为 {}", self.threshold);
        Some(self.filter(adapter))
    }

    /// 开关递归提升；仅在 `Active` 时重新过滤
    pub fn set_recursive_lift(
        &mut self,
        enabled: bool,
        adapter: &mut dyn PresentationAdapter,
    ) -> Option<SessionStats> {
        self.recursive_lift = enabled;
        if !self.is_active() {
            return None;
        }
        info!("🚀 递归提升已{}", if enabled { "启用" } else { "关闭" });
        Some(self.filter(adapter))
    }

    /// 清空全部缓存（评分、层级、提升标记）；`Active` 时立即重新处理
    pub fn reprocess(&mut self, adapter: &mut dyn PresentationAdapter) -> Option<SessionStats> {
        info!("🔄 手动重新处理，清空缓存");
        self.scores.clear();
        self.hierarchy = Hierarchy::new();
        self.hierarchy_ids.clear();
        self.decisions.clear();
        self.last_stats = None;

        if self.is_active() {
            Some(self.process_all(adapter))
        } else {
            None
        }
    }

    /// 重新读取评论列表：为新评论评分、同步层级并过滤
    pub fn process_all(&mut self, adapter: &mut dyn PresentationAdapter) -> SessionStats {
        let items = adapter.list_items();
        info!("📊 找到 {} 条评论", items.len());

        self.sync_hierarchy(&items);
        let processed = self.score_new_items(&items, adapter);
        info!("✅ 新评分 {}/{} 条评论", processed, items.len());

        self.apply(&items, adapter)
    }

    /// 当前评论的评分分布
    pub fn score_distribution(&self) -> ScoreDistribution {
        ScoreDistribution::from_scores(
            self.hierarchy_ids
                .iter()
                .filter_map(|id| self.scores.get(id)),
        )
    }

    /// 只重新运行可见性引擎
    fn filter(&mut self, adapter: &mut dyn PresentationAdapter) -> SessionStats {
        let items = adapter.list_items();
        // 评论集合变化时先同步层级，但不评分新评论（未评分评论默认可见）
        self.sync_hierarchy(&items);
        self.apply(&items, adapter)
    }

    fn apply(&mut self, items: &[Item], adapter: &mut dyn PresentationAdapter) -> SessionStats {
        let decisions = self.engine.decide(
            items,
            &self.scores,
            &self.hierarchy,
            self.threshold,
            self.recursive_lift,
        );

        for item in items {
            let decision = decisions.get(&item.id).copied().unwrap_or_default();
            if let Err(e) = adapter.apply_decision(&item.id, &decision) {
                warn!("⚠️ 应用评论 {} 的可见性失败: {}", item.id, e);
            }
        }

        let stats = SessionStats::compute(items, &self.scores, &decisions);
        info!(
            "👁️ 可见 {}/{} 条评论，已评分 {} 条，提升 {} 条，平均质量 {:.2}",
            stats.visible, stats.total, stats.processed, stats.lifted, stats.average_moral_value
        );
        self.decisions = decisions;
        self.last_stats = Some(stats);
        stats
    }

    /// 评论集合变化时更新层级
    ///
    /// 集合不变时沿用缓存；只增不减时增量更新；否则完全重建。
    fn sync_hierarchy(&mut self, items: &[Item]) {
        let ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        if !self.hierarchy_ids.is_empty() && ids == self.hierarchy_ids {
            debug!("🏗️ 评论集合未变化，沿用已有层级");
            return;
        }

        let current: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let grew = !self.hierarchy_ids.is_empty()
            && self
                .hierarchy_ids
                .iter()
                .all(|id| current.contains(id.as_str()));

        self.hierarchy = if grew {
            self.builder.extend(&self.hierarchy, items)
        } else {
            self.builder.build(items)
        };
        self.hierarchy_ids = ids;
    }

    /// 为缓存中已有评分的当前评论重新渲染徽章
    fn restore_badges(&self, adapter: &mut dyn PresentationAdapter) {
        let mut restored = 0usize;
        for item in adapter.list_items() {
            let Some(score) = self.scores.get(&item.id) else {
                continue;
            };
            match adapter.render_score(&item.id, score) {
                Ok(()) => restored += 1,
                Err(e) => warn!("⚠️ 评论 {} 的评分徽章渲染失败: {}", item.id, e),
            }
        }
        if restored > 0 {
            debug!("🏷️ 恢复 {} 个评分徽章", restored);
        }
    }

    /// 为尚未评分且足够长的评论评分，返回新评分数量
    fn score_new_items(&mut self, items: &[Item], adapter: &mut dyn PresentationAdapter) -> usize {
        let mut processed = 0;

        for (index, item) in items.iter().enumerate() {
            if self.scores.contains_key(&item.id) {
                continue;
            }
            let text = item.text.trim();
            if text.chars().count() <= self.min_scored_chars {
                debug!("评论 {} 文本过短，跳过评分", index + 1);
                continue;
            }

            let score = self.scorer.score(text);
            if tracing::enabled!(Level::DEBUG) {
                let normalized = text.to_lowercase();
                let coherent: Vec<&str> =
                    self.scorer.coherence_keywords().matches(&normalized).collect();
                let entropic: Vec<&str> =
                    self.scorer.entropy_keywords().matches(&normalized).collect();
                debug!("🔑 评论 {} 命中关键词: ζ {:?} / S {:?}", index + 1, coherent, entropic);
            }
            debug!(
                "📝 评论 {}: \"{}\" → M:{} ζ:{} S:{}",
                index + 1,
                truncate_text(text, 50),
                score.moral_value,
                score.coherence,
                score.entropy
            );
            self.scores.insert(item.id.clone(), score);
            processed += 1;

            if let Err(e) = adapter.render_score(&item.id, &score) {
                warn!("⚠️ 评论 {} 的评分徽章渲染失败: {}", item.id, e);
            }
        }

        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use crate::presentation::ThreadView;

    const GOOD: &str = "I appreciate this nuanced analysis, thanks for the source.";
    const BAD: &str = "you are an idiot, wake up sheep";
    const DECENT: &str = "Interesting perspective, do you have a study on this?";

    fn thread() -> ThreadView {
        ThreadView::from_items(
            "thread",
            vec![
                Item::new("a", GOOD, Position::new(0.0, 0.0)),
                Item::new("b", BAD, Position::new(10.0, 20.0)),
                Item::new("c", DECENT, Position::new(20.0, 40.0)),
            ],
        )
    }

    fn session() -> FilterSession {
        FilterSession::new(Scorer::default(), &Config::default())
    }

    #[test]
    fn test_inactive_session_does_nothing() {
        let mut view = thread();
        let mut session = session();
        assert_eq!(session.state(), SessionState::Inactive);
        assert!(session.set_threshold(0.5, &mut view).is_none());
        assert!(session.scores().is_empty());
        assert_eq!(session.threshold(), 0.5);
    }

    #[test]
    fn test_session_can_start_active() {
        let mut view = thread();
        let config = Config {
            active: true,
            ..Config::default()
        };
        let mut session = FilterSession::new(Scorer::default(), &config);
        assert!(session.is_active());
        let stats = session.set_threshold(0.0, &mut view).unwrap();
        // 尚未评分：全部默认可见
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.visible, 3);
        assert_eq!(session.process_all(&mut view).lifted, 1);
    }

    #[test]
    fn test_activate_scores_and_lifts() {
        let mut view = thread();
        let mut session = session();

        let stats = session.activate(&mut view);
        assert!(session.is_active());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.visible, 2);
        assert_eq!(stats.lifted, 1);

        assert!(!view.is_visible("b"));
        assert_eq!(session.decision("c"), VisibilityDecision::lifted(1));
        assert_eq!(
            view.rendered("c").unwrap().lift_annotation.as_deref(),
            Some("🚀 LIFTED 1 level")
        );
    }

    #[test]
    fn test_threshold_change_does_not_rescore() {
        let mut view = thread();
        let mut session = session();
        session.activate(&mut view);
        let before = session.scores().clone();

        let stats = session.set_threshold(-1.0, &mut view).unwrap();
        assert_eq!(stats.visible, 3);
        assert_eq!(stats.lifted, 0);
        assert_eq!(session.scores(), &before);
    }

    #[test]
    fn test_toggle_lift_off() {
        let mut view = thread();
        let mut session = session();
        session.activate(&mut view);

        let stats = session.set_recursive_lift(false, &mut view).unwrap();
        assert_eq!(stats.lifted, 0);
        assert!(view.is_visible("c"));
        assert!(view.rendered("c").unwrap().lift_annotation.is_none());
    }

    #[test]
    fn test_deactivate_resets_view_and_keeps_scores() {
        let mut view = thread();
        let mut session = session();
        session.activate(&mut view);

        session.deactivate(&mut view);
        assert_eq!(session.state(), SessionState::Inactive);
        assert_eq!(view.visible_count(), 3);
        assert!(view.rendered("a").unwrap().badge.is_none());
        assert_eq!(session.scores().len(), 3);
        assert_eq!(session.decision("b"), VisibilityDecision::shown());
    }

    #[test]
    fn test_reactivate_restores_badges() {
        let mut view = thread();
        let mut session = session();
        session.activate(&mut view);
        session.deactivate(&mut view);

        let stats = session.activate(&mut view);
        assert_eq!(stats.processed, 3);
        assert!(!view.is_visible("b"));
        for id in ["a", "b", "c"] {
            assert!(view.rendered(id).unwrap().badge.is_some(), "{} 缺少徽章", id);
        }
        assert_eq!(
            view.rendered("a").unwrap().badge.as_ref().unwrap().label,
            "M:1"
        );
        assert!(view.rendered("c").unwrap().lift_annotation.is_some());
    }

    #[test]
    fn test_reprocess_clears_caches() {
        let mut view = thread();
        let mut session = session();
        assert!(session.reprocess(&mut view).is_none());

        session.activate(&mut view);
        view.remove_item("b");
        let stats = session.reprocess(&mut view).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(session.scores().len(), 2);
        assert!(session.score_of("b").is_none());
        assert_eq!(session.hierarchy().parent_of("c"), Some("a"));
    }

    #[test]
    fn test_short_text_is_unscored_and_visible() {
        let mut view = ThreadView::from_items(
            "short",
            vec![Item::new("x", "ok", Position::default())],
        );
        let mut session = session();
        let stats = session.activate(&mut view);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.visible, 1);
        assert!(view.rendered("x").unwrap().badge.is_none());
    }

    #[test]
    fn test_new_items_extend_hierarchy() {
        let mut view = thread();
        let mut session = session();
        session.activate(&mut view);

        view.push_item(Item::new("d", GOOD, Position::new(30.0, 60.0)));
        let stats = session.activate(&mut view);
        assert_eq!(stats.total, 4);
        assert_eq!(session.hierarchy().parent_of("d"), Some("c"));
        // "c" 达标，所以 "d" 没有被埋没
        assert_eq!(session.decision("d"), VisibilityDecision::shown());
        assert_eq!(session.score_distribution().total(), 4);
    }
}
