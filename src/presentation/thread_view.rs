//! 内存中的评论串视图
//!
//! 以 [`ThreadPage`] 为数据源的 [`PresentationAdapter`] 实现，
//! 记录每条评论的可见性、徽章和提升标注。命令行和测试都使用它。

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::models::{Item, Score, ScoreTier, ThreadPage, VisibilityDecision};
use crate::presentation::adapter::PresentationAdapter;

/// 评分徽章
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBadge {
    pub label: String,
    pub tier: ScoreTier,
    pub color: &'static str,
}

impl ScoreBadge {
    pub fn from_score(score: &Score) -> Self {
        let tier = score.tier();
        Self {
            label: score.badge_label(),
            tier,
            color: tier.color(),
        }
    }
}

/// 单条评论的渲染状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedItem {
    pub id: String,
    pub visible: bool,
    pub badge: Option<ScoreBadge>,
    pub lift_annotation: Option<String>,
}

/// 内存评论串视图
#[derive(Debug, Clone)]
pub struct ThreadView {
    name: String,
    items: Vec<Item>,
    rendered: HashMap<String, RenderedItem>,
}

impl ThreadView {
    pub fn new(page: ThreadPage) -> Self {
        Self::from_items(page.name, page.items)
    }

    pub fn from_items(name: impl Into<String>, items: Vec<Item>) -> Self {
        let rendered = items
            .iter()
            .map(|item| (item.id.clone(), blank(&item.id)))
            .collect();
        Self {
            name: name.into(),
            items,
            rendered,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 追加新加载的评论（例如"加载更多"）
    pub fn push_item(&mut self, item: Item) {
        self.rendered.insert(item.id.clone(), blank(&item.id));
        self.items.push(item);
    }

    /// 移除评论
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
        self.rendered.remove(id);
    }

    pub fn rendered(&self, id: &str) -> Option<&RenderedItem> {
        self.rendered.get(id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.rendered.get(id).map(|r| r.visible).unwrap_or(false)
    }

    /// 按显示顺序输出渲染状态
    pub fn snapshot(&self) -> Vec<RenderedItem> {
        self.items
            .iter()
            .filter_map(|item| self.rendered.get(&item.id).cloned())
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.rendered.values().filter(|r| r.visible).count()
    }

    fn entry(&mut self, id: &str) -> Result<&mut RenderedItem> {
        match self.rendered.get_mut(id) {
            Some(entry) => Ok(entry),
            None => bail!("评论 {} 不在视图中", id),
        }
    }
}

fn blank(id: &str) -> RenderedItem {
    RenderedItem {
        id: id.to_string(),
        visible: true,
        badge: None,
        lift_annotation: None,
    }
}

impl PresentationAdapter for ThreadView {
    fn list_items(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn render_score(&mut self, id: &str, score: &Score) -> Result<()> {
        self.entry(id)?.badge = Some(ScoreBadge::from_score(score));
        Ok(())
    }

    fn apply_decision(&mut self, id: &str, decision: &VisibilityDecision) -> Result<()> {
        let entry = self.entry(id)?;
        entry.visible = decision.visible;
        entry.lift_annotation = decision.lift_label();
        Ok(())
    }

    fn reset(&mut self) {
        for entry in self.rendered.values_mut() {
            entry.visible = true;
            entry.badge = None;
            entry.lift_annotation = None;
        }
    }
}
