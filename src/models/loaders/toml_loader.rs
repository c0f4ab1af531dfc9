use crate::error::{AppError, AppResult, FileError};
use crate::models::thread::ThreadPage;
use crate::scoring::keywords::KeywordFile;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并转换为 ThreadPage 对象
pub async fn load_toml_to_thread_page(toml_file_path: &Path) -> AppResult<ThreadPage> {
    let display = toml_file_path.display().to_string();
    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;

    let mut page: ThreadPage =
        toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(&display, e))?;

    // 设置文件路径
    page.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(page)
}

/// 从文件夹中加载所有 TOML 评论串
///
/// 单个文件解析失败只记录警告，不影响其他文件。结果按文件名排序。
pub async fn load_all_thread_files(folder_path: &str) -> AppResult<Vec<ThreadPage>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.to_string(),
        }
        .into());
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path, e))?
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut pages = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_toml_to_thread_page(&path).await {
            Ok(page) => {
                tracing::info!("成功加载 {} 条评论", page.items.len());
                pages.push(page);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(pages)
}

/// 加载自定义关键词表文件
pub async fn load_keyword_file(path: &Path) -> AppResult<KeywordFile> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(&display, e))?;

    toml::from_str(&content).map_err(|e| AppError::toml_parse_failed(&display, e))
}
