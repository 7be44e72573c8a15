//! 题目编译器
//!
//! 将扫描结果投影为有序的题目记录。每次编译都是完整的重新计算：
//! 题号只取决于本次扫描顺序，答案一律从空开始。

use tracing::{debug, info};

use crate::config::Config;
use crate::error::CompileError;
use crate::models::question::QuestionRecord;
use crate::models::template::Template;
use crate::scanner::{BlankScanner, ScanSettings};
use crate::utils::logging::truncate_text;

/// 题目编译器
#[derive(Debug, Clone)]
pub struct QuestionCompiler {
    scanner: BlankScanner,
    default_points: u32,
}

impl Default for QuestionCompiler {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl QuestionCompiler {
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: BlankScanner::new(ScanSettings::from(config)),
            default_points: config.default_points.max(1),
        }
    }

    pub fn scanner(&self) -> &BlankScanner {
        &self.scanner
    }

    /// 检查编译前置条件：标题非空、至少一个分区、至少一个填空标记
    pub fn check(&self, template: &Template) -> Result<usize, CompileError> {
        if template.title.trim().is_empty() {
            return Err(CompileError::EmptyTitle);
        }
        if template.sections.is_empty() {
            return Err(CompileError::NoSections);
        }
        match self.scanner.count(template) {
            0 => Err(CompileError::NoBlanks),
            n => Ok(n),
        }
    }

    /// 编译模板，题号为 1..=N
    pub fn compile(&self, template: &Template) -> Result<Vec<QuestionRecord>, CompileError> {
        self.check(template)?;

        let placeholder = self.scanner.settings().placeholder.as_str();
        let questions: Vec<QuestionRecord> = self
            .scanner
            .occurrences(template)
            .zip(1u32..)
            .map(|(occ, order)| {
                let context = occ.context(placeholder);
                debug!("题目 {} {}: {}", order, occ.location, truncate_text(&context, 60));
                QuestionRecord::new(order, self.default_points, context)
            })
            .collect();

        info!(
            "✓ 模板「{}」编译完成，共 {} 道题",
            truncate_text(&template.title, 40),
            questions.len()
        );
        Ok(questions)
    }
}
