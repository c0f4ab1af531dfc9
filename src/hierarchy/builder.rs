//! 层级推断 - 核心算法层
//!
//! 根据评论的布局位置（或宿主提供的真实父 ID）推断父子关系。
//!
//! 几何推断规则：候选父评论必须严格位于当前评论上方（`top` 更小）
//! 且缩进严格更少（`left` 更小）；在所有候选中选 `top` 最大的一个，
//! `top` 相同时取输入顺序中最先出现的。父评论总是严格在子评论上方，
//! 所以沿父链前进时 `top` 严格递减，不可能成环。

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::Item;

/// 子评论 ID → 父评论 ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hierarchy {
    parents: HashMap<String, String>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// 父评论 ID；根评论返回 `None`
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    fn link(&mut self, child: &str, parent: &str) {
        self.parents.insert(child.to_string(), parent.to_string());
    }
}

impl FromIterator<(String, String)> for Hierarchy {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            parents: iter.into_iter().collect(),
        }
    }
}

/// 层级构建器
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 从头构建层级（O(n²)）
    pub fn build(&self, items: &[Item]) -> Hierarchy {
        let known: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let mut hierarchy = Hierarchy::new();

        for item in items {
            if let Some(parent) = self.resolve_parent(item, items, &known) {
                debug!("📍 评论 {} → 父评论 {}", item.id, parent);
                hierarchy.link(&item.id, parent);
            }
        }

        info!("🏗️ 层级构建完成: {} 条父子关系", hierarchy.len());
        hierarchy
    }

    /// 增量构建：旧评论沿用已有的父子关系，只为新评论推断父评论
    ///
    /// 旧关系只有在父评论仍在当前集合中、且仍是该评论的显式父评论
    /// 或仍满足几何规则时才沿用，否则重新推断。
    pub fn extend(&self, previous: &Hierarchy, items: &[Item]) -> Hierarchy {
        let known: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
        let by_id: HashMap<&str, &Item> = items.iter().map(|item| (item.id.as_str(), item)).collect();
        let mut hierarchy = Hierarchy::new();
        let mut inferred = 0usize;

        for item in items {
            let kept = previous.parent_of(&item.id).filter(|parent| {
                known.contains(parent) && still_valid(item, by_id.get(parent).copied())
            });
            match kept {
                Some(parent) => hierarchy.link(&item.id, parent),
                _ => {
                    inferred += 1;
                    if let Some(parent) = self.resolve_parent(item, items, &known) {
                        debug!("📍 评论 {} → 父评论 {}", item.id, parent);
                        hierarchy.link(&item.id, parent);
                    }
                }
            }
        }

        info!(
            "🏗️ 层级增量更新: 重新推断 {} 条评论，共 {} 条父子关系",
            inferred,
            hierarchy.len()
        );
        hierarchy
    }

    fn resolve_parent<'a>(
        &self,
        item: &'a Item,
        items: &'a [Item],
        known: &HashSet<&str>,
    ) -> Option<&'a str> {
        match item.explicit_parent_id.as_deref() {
            Some(parent) if parent == item.id => {
                warn!("⚠️ 评论 {} 声明自己为父评论，按根评论处理", item.id);
                None
            }
            Some(parent) if !known.contains(parent) => {
                warn!("⚠️ 评论 {} 的父评论 {} 不在当前列表中，按根评论处理", item.id, parent);
                None
            }
            Some(parent) => Some(parent),
            None => infer_parent(item, items).map(|p| p.id.as_str()),
        }
    }
}

/// 旧的父子关系在当前布局下是否仍然成立
fn still_valid(item: &Item, parent: Option<&Item>) -> bool {
    let Some(parent) = parent else {
        return false;
    };
    match item.explicit_parent_id.as_deref() {
        Some(explicit) => explicit == parent.id && explicit != item.id,
        None => is_geometric_ancestor(parent, item),
    }
}

fn is_geometric_ancestor(candidate: &Item, item: &Item) -> bool {
    candidate.position.top < item.position.top && candidate.position.left < item.position.left
}

/// 在所有评论中寻找最近的上方、缩进更少的评论
fn infer_parent<'a>(item: &Item, items: &'a [Item]) -> Option<&'a Item> {
    let mut best: Option<&Item> = None;

    for other in items {
        if other.id == item.id {
            continue;
        }
        if is_geometric_ancestor(other, item) {
            match best {
                Some(current) if other.position.top <= current.position.top => {}
                _ => best = Some(other),
            }
        }
    }

    best
}
