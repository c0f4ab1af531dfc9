use serde::{Deserialize, Serialize};

use super::item::Item;

/// 一个评论串（从 TOML 文件加载）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadPage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ThreadPage {
    /// 用于输出文件的名称（去掉路径分隔符等非法字符）
    pub fn file_stem(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    }

    /// 日志中标识来源：有文件路径时用路径，否则用名称
    pub fn source_label(&self) -> &str {
        self.file_path.as_deref().unwrap_or(&self.name)
    }
}
