//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个命令行程序的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量评论串处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载评论串（Vec<ThreadPage>）
//! - 输出全局统计信息
//!
//! ### `thread_processor` - 单个评论串处理器
//! - 为一个评论串运行过滤会话
//! - 生成报告并导出决策
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ThreadPage>)
//!     ↓
//! thread_processor (处理一个 ThreadPage)
//!     ↓
//! session::FilterSession (状态机 + 缓存)
//!     ↓
//! scoring / hierarchy / visibility (核心算法)
//! ```

pub mod batch_processor;
pub mod thread_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use thread_processor::{process_thread, write_outcome, ThreadOutcome};
