//! 批量评论串处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量评论串的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、加载关键词表、创建评分器
//! 2. **批量加载**：扫描并加载所有待处理的评论串（`Vec<ThreadPage>`）
//! 3. **逐个处理**：委托 thread_processor 处理单个评论串
//! 4. **全局统计**：汇总所有评论串的处理结果

use crate::config::Config;
use crate::models::{load_all_thread_files, load_keyword_file, ThreadPage};
use crate::orchestrator::thread_processor::{process_thread, write_outcome};
use crate::scoring::Scorer;
use crate::utils::logging::{init_log_file, log_startup, log_threads_loaded, print_final_stats};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    scorer: Scorer,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(config.threshold, config.recursive_lift_enabled);

        let scorer = load_scorer(&config).await?;

        Ok(Self { config, scorer })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        // 加载所有待处理的评论串
        let threads = self.load_threads().await?;

        if threads.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_threads_loaded(threads.len());

        let stats = self.process_all_threads(threads);

        // 输出最终统计
        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 加载评论串
    async fn load_threads(&self) -> Result<Vec<ThreadPage>> {
        info!("\n📁 正在扫描待处理的评论串...");
        let threads = load_all_thread_files(&self.config.thread_folder).await?;
        Ok(threads)
    }

    /// 处理所有评论串
    ///
    /// 单个评论串失败不影响其他评论串。
    fn process_all_threads(&self, threads: Vec<ThreadPage>) -> ProcessingStats {
        let total = threads.len();
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };
        let output_dir = Path::new(&self.config.output_dir);

        for (index, thread) in threads.into_iter().enumerate() {
            let thread_index = index + 1;
            let file_stem = thread.file_stem();
            let source = thread.source_label().to_string();

            let result = process_thread(&self.scorer, thread, thread_index, total, &self.config)
                .and_then(|outcome| write_outcome(&outcome, output_dir, &file_stem));

            match result {
                Ok(_) => stats.success += 1,
                Err(e) => {
                    error!("[评论串 {}] ❌ 处理失败 ({}): {:#}", thread_index, source, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 根据配置创建评分器：指定了关键词文件时替换内置表
async fn load_scorer(config: &Config) -> Result<Scorer> {
    let Some(path) = config.keyword_file.as_deref() else {
        let scorer = Scorer::default();
        info!(
            "📚 使用内置关键词表: {} 个连贯性关键词, {} 个熵关键词",
            scorer.coherence_keywords().len(),
            scorer.entropy_keywords().len()
        );
        return Ok(scorer);
    };

    let file = load_keyword_file(Path::new(path))
        .await
        .with_context(|| format!("无法加载关键词表: {}", path))?;
    let (coherence, entropy) = file.into_tables()?;
    info!(
        "📚 已加载关键词表 {}: {} 个连贯性关键词, {} 个熵关键词",
        path,
        coherence.len(),
        entropy.len()
    );
    Ok(Scorer::new(coherence, entropy))
}
