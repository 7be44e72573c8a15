//! 日志工具模块
//!
//! 日志同时输出到终端和日志文件；文件中不带颜色控制符

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const RULE_WIDTH: usize = 60;

/// 安装全局日志订阅器
///
/// 默认级别为 info（`verbose` 时为 debug），`RUST_LOG` 优先。
/// `log_file_path` 会被截断并写入表头，之后的日志事件都追加到该文件。
/// 订阅器已存在时只重写文件表头。
pub fn init(verbose: bool, log_file_path: &str) -> Result<()> {
    let file = create_log_file(log_file_path)?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer().with_target(false);
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        info!("📝 日志文件: {}", log_file_path);
    }
    Ok(())
}

/// 新建日志文件并写入带时间戳的表头
fn create_log_file(path: &str) -> Result<File> {
    let mut file = File::create(path).with_context(|| format!("无法创建日志文件: {}", path))?;
    writeln!(
        file,
        "{rule}\n填空表单编译日志 - {}\n{rule}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        rule = "=".repeat(RULE_WIDTH)
    )?;
    Ok(file)
}

pub fn log_startup(template_folder: &str, output_folder: &str) {
    info!("{}", "=".repeat(RULE_WIDTH));
    info!("🚀 填空表单批量编译");
    info!("📁 模板目录: {}", template_folder);
    info!("📤 草稿输出: {}", output_folder);
    info!("{}", "=".repeat(RULE_WIDTH));
}

/// 批量编译结束时的汇总
pub fn print_final_stats(success: usize, failed: usize, questions: usize) {
    info!("{}", "=".repeat(RULE_WIDTH));
    info!(
        "📊 编译汇总 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 编译成功: {}/{}", success, success + failed);
    if failed > 0 {
        info!("❌ 编译失败: {}", failed);
    }
    info!("📝 题目总数: {}", questions);
    info!("{}", "=".repeat(RULE_WIDTH));
}

/// 按字符截断，超出部分用 `...` 表示
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("填空题目", 2), "填空...");
        assert_eq!(truncate_text("填空", 2), "填空");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn test_log_file_gets_header() {
        let path = std::env::temp_dir().join(format!("fill_blank_log_{}.txt", std::process::id()));
        let path_str = path.to_str().unwrap();
        std::fs::write(&path, "stale content").unwrap();

        drop(create_log_file(path_str).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(content.starts_with(&"=".repeat(RULE_WIDTH)));
        assert!(content.contains("填空表单编译日志"));
        assert!(!content.contains("stale content"));
    }
}
