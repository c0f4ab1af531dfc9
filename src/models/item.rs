use serde::{Deserialize, Serialize};

/// 布局位置提示（仅用于推断层级关系）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// 垂直偏移（越小越靠上）
    #[serde(default)]
    pub top: f64,
    /// 水平缩进（越小越靠左）
    #[serde(default)]
    pub left: f64,
}

impl Position {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// 一条评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// 会话内唯一的稳定 ID
    pub id: String,
    /// 原始文本
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub position: Position,
    /// 宿主环境提供的真实父评论 ID，存在时跳过几何推断
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_parent_id: Option<String>,
}

impl Item {
    /// 创建只带布局位置的评论
    pub fn new(id: impl Into<String>, text: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            position,
            explicit_parent_id: None,
        }
    }

    /// 指定真实父评论
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.explicit_parent_id = Some(parent_id.into());
        self
    }
}
