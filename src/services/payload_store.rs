//! 载荷存储服务
//!
//! 只负责"把保存载荷写到输出目录"，不关心会话状态

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::question::QuestionRecord;
use crate::serialization::{encode_questions, SavePayload};

/// 载荷存储服务
///
/// 每个表单写两个文件：
/// - `<slug>.template.json` - 模板，供以后重新编辑
/// - `<slug>.questions.json` - 题目列表，供评分使用
pub struct PayloadStore {
    output_dir: PathBuf,
}

/// 写入结果
#[derive(Debug, Clone)]
pub struct StoredPaths {
    pub template: Option<PathBuf>,
    pub questions: PathBuf,
}

impl PayloadStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 写入完整的保存载荷
    pub async fn write_payload(&self, name: &str, payload: &SavePayload) -> AppResult<StoredPaths> {
        self.ensure_dir().await?;
        let slug = slugify(name);

        let template_path = self.output_dir.join(format!("{}.template.json", slug));
        write_file(&template_path, payload.template_json.as_bytes()).await?;

        let questions_path = self.output_dir.join(format!("{}.questions.json", slug));
        write_file(&questions_path, payload.questions_json()?.as_bytes()).await?;

        info!(
            "✓ 已保存: {} ({} 道题)",
            questions_path.display(),
            payload.questions.len()
        );
        Ok(StoredPaths {
            template: Some(template_path),
            questions: questions_path,
        })
    }

    /// 写入尚未填写答案的题目草稿
    pub async fn write_draft(&self, name: &str, questions: &[QuestionRecord]) -> AppResult<StoredPaths> {
        self.ensure_dir().await?;
        let path = self
            .output_dir
            .join(format!("{}.draft.questions.json", slugify(name)));
        write_file(&path, encode_questions(questions)?.as_bytes()).await?;

        debug!("草稿已写入: {}", path.display());
        Ok(StoredPaths {
            template: None,
            questions: path,
        })
    }

    async fn ensure_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_dir.display().to_string(), e))
    }
}

async fn write_file(path: &Path, content: &[u8]) -> AppResult<()> {
    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))
}

/// 由表单标题生成文件名：非字母数字字符压缩为一个 `-`
pub fn slugify(name: &str) -> String {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    let re = NON_WORD.get_or_init(|| Regex::new(r"[^\p{L}\p{N}_]+").expect("valid slug regex"));

    let slug = re.replace_all(name.trim(), "-");
    let slug = slug.trim_matches('-').to_lowercase();
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}
