//! 单个评论串处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个评论串，是评论串级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **创建视图**：用 `ThreadView` 承载评论串
//! 2. **运行会话**：激活 `FilterSession`，评分、建层级、过滤
//! 3. **生成报告**：构建 `ThreadReport` 并写入日志文件
//! 4. **导出决策**：把每条评论的可见性和徽章写成 JSON

use crate::config::Config;
use crate::error::AppError;
use crate::models::ThreadPage;
use crate::presentation::{PresentationAdapter, RenderedItem, ThreadView};
use crate::scoring::Scorer;
use crate::session::{FilterSession, ScoreDistribution, SessionStats, ThreadReport};
use crate::utils::logging::{append_log, log_thread_start};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 单个评论串的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct ThreadOutcome {
    pub name: String,
    pub threshold: f64,
    pub recursive_lift: bool,
    pub stats: SessionStats,
    pub distribution: ScoreDistribution,
    pub items: Vec<RenderedItem>,
}

/// 处理单个评论串
///
/// # 参数
/// - `scorer`: 评分器
/// - `thread`: 评论串数据
/// - `thread_index`: 评论串编号（从1开始，用于日志）
/// - `total`: 评论串总数
/// - `config`: 配置
///
/// # 返回
/// 返回处理结果
pub fn process_thread(
    scorer: &Scorer,
    thread: ThreadPage,
    thread_index: usize,
    total: usize,
    config: &Config,
) -> Result<ThreadOutcome> {
    log_thread_start(thread_index, total, thread.source_label(), thread.items.len());

    let name = thread.name.clone();
    let mut view = ThreadView::new(thread);
    let mut session = FilterSession::new(scorer.clone(), config);

    let stats = session.activate(&mut view);

    match ThreadReport::build(&name, &view.list_items(), session.scores()) {
        Some(report) => {
            info!("\n{}", report);
            if let Err(e) = append_log(&config.output_log_file, &report.to_string()) {
                warn!("⚠️ 写入报告失败: {}", e);
            }
        }
        None => warn!("⚠️ 评论串 {} 没有可评分的评论", name),
    }

    let outcome = ThreadOutcome {
        name,
        threshold: session.threshold(),
        recursive_lift: session.recursive_lift_enabled(),
        stats,
        distribution: session.score_distribution(),
        items: view.snapshot(),
    };

    Ok(outcome)
}

/// 把处理结果写为 JSON
pub fn write_outcome(outcome: &ThreadOutcome, output_dir: &Path, file_stem: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| AppError::file_write_failed(output_dir.display().to_string(), e))?;

    let path = output_dir.join(format!("{}.json", file_stem));
    let json = serde_json::to_string_pretty(outcome)?;
    std::fs::write(&path, json)
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    info!("💾 决策已保存至: {}", path.display());
    Ok(path)
}
