//! 批量编译编排
//!
//! 扫描模板目录中的所有 JSON 模板，逐个预览、编译并写出题目草稿。
//! 单个模板失败只记录日志，不影响后续模板。

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{load_all_template_files, TemplateFile};
use crate::services::PayloadStore;
use crate::utils::logging;
use crate::workflow::AuthoringSession;

/// 应用主结构
pub struct App {
    config: Config,
    store: PayloadStore,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileStats {
    pub success: usize,
    pub failed: usize,
    pub questions: usize,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置无效")?;
        logging::log_startup(&config.template_folder, &config.output_folder);

        let store = PayloadStore::new(&config.output_folder);
        Ok(Self { config, store })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<CompileStats> {
        info!("\n📁 正在扫描待编译的模板...");
        let templates = load_all_template_files(&self.config.template_folder).await?;

        if templates.is_empty() {
            warn!("⚠️ 没有找到待编译的模板文件，程序结束");
            return Ok(CompileStats::default());
        }
        info!("✓ 找到 {} 个模板", templates.len());

        let mut stats = CompileStats::default();
        for (index, file) in templates.iter().enumerate() {
            match self.compile_one(index + 1, file).await {
                Ok(count) => {
                    stats.success += 1;
                    stats.questions += count;
                }
                Err(e) => {
                    error!("[模板 {}] ❌ {}: {:#}", index + 1, file.stem(), e);
                    stats.failed += 1;
                }
            }
        }

        logging::print_final_stats(stats.success, stats.failed, stats.questions);
        Ok(stats)
    }

    /// 编译单个模板并写出草稿，返回题目数
    async fn compile_one(&self, index: usize, file: &TemplateFile) -> Result<usize> {
        info!("\n[模板 {}] {}", index, "─".repeat(30));
        info!("[模板 {}] 名称: {}", index, file.stem());

        let mut session = AuthoringSession::with_template(&self.config, file.template.clone());
        if self.config.verbose_logging {
            info!("[模板 {}] 预览:\n{}", index, session.preview().to_plain_text());
        }

        let questions = session.compile()?.to_vec();
        for q in questions.iter().take(3) {
            info!(
                "[模板 {}]   {}. {}",
                index,
                q.order,
                logging::truncate_text(&q.prompt_context, 60)
            );
        }

        let paths = self.store.write_draft(&file.stem(), &questions).await?;
        info!(
            "[模板 {}] ✓ 共 {} 道题，草稿: {}",
            index,
            questions.len(),
            paths.questions.display()
        );
        Ok(questions.len())
    }
}
