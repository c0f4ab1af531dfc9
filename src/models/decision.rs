use serde::{Deserialize, Serialize};

/// 单条评论的可见性决策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityDecision {
    pub visible: bool,
    /// 被埋没的祖先层数；未被提升时为 `None`
    pub lift_depth: Option<usize>,
}

impl VisibilityDecision {
    /// 可见、未提升
    pub fn shown() -> Self {
        Self {
            visible: true,
            lift_depth: None,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            lift_depth: None,
        }
    }

    /// 可见，并从 `depth` 层埋没中被提升
    pub fn lifted(depth: usize) -> Self {
        Self {
            visible: true,
            lift_depth: Some(depth),
        }
    }

    pub fn is_lifted(&self) -> bool {
        self.lift_depth.is_some()
    }

    /// 提升标注文本，例如 `🚀 LIFTED 2 levels`
    pub fn lift_label(&self) -> Option<String> {
        self.lift_depth.map(|depth| {
            format!(
                "🚀 LIFTED {} level{}",
                depth,
                if depth > 1 { "s" } else { "" }
            )
        })
    }
}

impl Default for VisibilityDecision {
    fn default() -> Self {
        Self::shown()
    }
}
