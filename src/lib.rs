//! # Coherence Filter
//!
//! 按"连贯性"给评论串中的每条评论打分，并根据阈值隐藏低质量评论的 Rust 应用程序
//!
//! 核心公式：M = ζ - S（道德价值 = 连贯性 - 熵）
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 评论、分数、可见性决策、评论串及 TOML 加载器
//!
//! ### ② 算法层（Scoring / Hierarchy / Visibility）
//! - `scoring/` - 关键词表 + 结构奖励 + 毒性惩罚，计算 ζ / S / M
//! - `hierarchy/` - 显式父子关系优先，否则按布局位置推断父评论
//! - `visibility/` - 阈值过滤 + 递归提升（被埋没的好评论）
//!
//! ### ③ 会话层（Session）
//! - `FilterSession` - 启用/关闭状态机，缓存分数，参数变化时重新过滤
//! - `SessionStats` / `ThreadReport` - 统计与报告
//!
//! ### ④ 展示层（Presentation）
//! - `PresentationAdapter` - 宿主环境接口（列出评论、渲染徽章、应用决策）
//! - `ThreadView` - 内存中的评论串视图
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量评论串处理器，管理资源
//! - `orchestrator/thread_processor` - 单个评论串处理器，生成报告并导出
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod scoring;
pub mod session;
pub mod utils;
pub mod visibility;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use hierarchy::{Hierarchy, HierarchyBuilder};
pub use models::{Item, Position, Score, ScoreTier, ThreadPage, VisibilityDecision};
pub use orchestrator::{process_thread, App};
pub use presentation::{PresentationAdapter, ThreadView};
pub use scoring::{KeywordTable, Scorer};
pub use session::{FilterSession, SessionState, SessionStats, ThreadReport};
pub use visibility::{Decisions, VisibilityEngine};
