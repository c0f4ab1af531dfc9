use tracing::warn;

use crate::error::ConfigError;

/// 阈值下限
pub const MIN_THRESHOLD: f64 = -1.0;
/// 阈值上限
pub const MAX_THRESHOLD: f64 = 1.0;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 过滤阈值（M = ζ - S），范围 [-1, 1]
    pub threshold: f64,
    /// 是否启用递归连贯性提升
    pub recursive_lift_enabled: bool,
    /// 启动后是否立即激活过滤
    pub active: bool,
    /// 参与评分的最短文本长度（去除首尾空白后，字符数必须大于此值）
    pub min_scored_chars: usize,
    /// 评论串 TOML 文件存放目录
    pub thread_folder: String,
    /// 自定义关键词表 TOML 文件（为空时使用内置表）
    pub keyword_file: Option<String>,
    /// 可见性决策 JSON 的输出目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            recursive_lift_enabled: true,
            active: false,
            min_scored_chars: 10,
            thread_folder: "threads".to_string(),
            keyword_file: None,
            output_dir: "output_decisions".to_string(),
            verbose_logging: false,
            output_log_file: "coherence_report.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        let threshold = std::env::var("COHERENCE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default.threshold);
        Self {
            threshold: clamp_threshold(threshold),
            recursive_lift_enabled: std::env::var("RECURSIVE_LIFT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.recursive_lift_enabled),
            active: std::env::var("COHERENCE_ACTIVE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.active),
            min_scored_chars: std::env::var("MIN_SCORED_CHARS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.min_scored_chars),
            thread_folder: std::env::var("THREAD_FOLDER").unwrap_or(default.thread_folder),
            keyword_file: std::env::var("KEYWORD_FILE").ok().filter(|v| !v.trim().is_empty()),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }
}

/// 将阈值限制在 [-1, 1] 范围内，越界时记录警告
pub fn clamp_threshold(value: f64) -> f64 {
    if !value.is_finite() {
        warn!("⚠️ 阈值 {} 无效，使用默认值 0.0", value);
        return 0.0;
    }
    if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value) {
        let clamped = value.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        warn!("⚠️ 阈值 {} 超出范围，已调整为 {}", value, clamped);
        return clamped;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_filter_defaults() {
        let config = Config::default();
        assert_eq!(config.threshold, 0.0);
        assert!(config.recursive_lift_enabled);
        assert!(!config.active);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamp_threshold() {
        assert_eq!(clamp_threshold(0.4), 0.4);
        assert_eq!(clamp_threshold(3.0), 1.0);
        assert_eq!(clamp_threshold(-7.5), -1.0);
        assert_eq!(clamp_threshold(f64::NAN), 0.0);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let config = Config {
            threshold: f64::NAN,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }
}
