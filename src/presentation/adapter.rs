//! 展示适配器接口
//!
//! 核心只通过此 trait 与宿主环境交互：宿主负责发现评论、提取文本、
//! 显示/隐藏评论、渲染评分徽章和提升标注。

use anyhow::Result;

use crate::models::{Item, Score, VisibilityDecision};

/// 宿主环境（网页、终端、测试替身等）
pub trait PresentationAdapter {
    /// 当前评论列表（按显示顺序）
    fn list_items(&self) -> Vec<Item>;

    /// 渲染评分徽章
    fn render_score(&mut self, id: &str, score: &Score) -> Result<()>;

    /// 应用可见性决策（显示/隐藏，以及提升标注）
    fn apply_decision(&mut self, id: &str, decision: &VisibilityDecision) -> Result<()>;

    /// 恢复全部可见并移除所有装饰
    fn reset(&mut self);
}
