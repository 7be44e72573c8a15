use crate::models::template::Template;
use crate::serialization::template_codec;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从磁盘加载的模板文件
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub path: PathBuf,
    pub template: Template,
}

impl TemplateFile {
    /// 不含扩展名的文件名，用于日志显示
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// 从 JSON 文件加载模板
///
/// 先按带类型标记的格式解析，失败时再尝试旧格式（`items` 形状）
pub async fn load_template_file(path: &Path) -> Result<TemplateFile> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取模板文件: {}", path.display()))?;

    let template = template_codec::deserialize_any(&content)
        .with_context(|| format!("无法解析模板文件: {}", path.display()))?;

    Ok(TemplateFile {
        path: path.to_path_buf(),
        template,
    })
}

/// 从文件夹中加载所有 JSON 模板
///
/// 单个文件解析失败只记录警告，不中断加载；结果按文件名排序
pub async fn load_all_template_files(folder_path: &str) -> Result<Vec<TemplateFile>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_template_file(&path).await {
            Ok(file) => {
                tracing::info!(
                    "成功加载 {} 个分区, {} 个字段",
                    file.template.sections.len(),
                    file.template.field_count()
                );
                templates.push(file);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(templates)
}
