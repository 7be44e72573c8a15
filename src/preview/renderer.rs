//! 预览渲染 - 仅用于给操作员反馈
//!
//! 预览是模板的纯函数派生结果，不会被保存，也不能当作数据来源。
//! 填空标记被替换为按扫描顺序编号的占位符，图标以名称的形式声明在
//! 节点上，由界面层直接绘制，渲染过程没有任何全局副作用。

use std::fmt::Write as _;

use crate::models::template::{Field, Template};
use crate::scanner::ScanSettings;

/// 文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    /// 空位，`number` 与编译后的题号一致（从 1 开始）
    Blank { number: usize },
}

/// 预览中的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewField {
    Text { spans: Vec<Span> },
    Group { prefix: String, items: Vec<Vec<Span>> },
}

impl PreviewField {
    /// 声明式图标名
    pub fn icon(&self) -> &'static str {
        match self {
            PreviewField::Text { .. } => "text",
            PreviewField::Group { .. } => "list",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSection {
    pub title: String,
    pub fields: Vec<PreviewField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub title: String,
    pub sections: Vec<PreviewSection>,
    pub blank_count: usize,
    placeholder: String,
}

/// 预览结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// 模板完全为空，没有可预览的内容
    Empty,
    Document(PreviewDocument),
}

impl Preview {
    pub fn is_empty(&self) -> bool {
        matches!(self, Preview::Empty)
    }

    /// 纯文本形式，用于日志和命令行输出
    pub fn to_plain_text(&self) -> String {
        match self {
            Preview::Empty => "（暂无可预览的内容）".to_string(),
            Preview::Document(doc) => doc.to_plain_text(),
        }
    }
}

/// 渲染模板预览
pub fn render(template: &Template, settings: &ScanSettings) -> Preview {
    if template.is_blank() {
        return Preview::Empty;
    }

    let mut counter = 0usize;
    let mut split = |text: &str| spans(text, &settings.marker, &mut counter);

    let sections = template
        .sections
        .iter()
        .map(|section| PreviewSection {
            title: section.title.clone(),
            fields: section
                .fields
                .iter()
                .map(|field| match field {
                    Field::Leaf { text } => PreviewField::Text {
                        spans: split(text.as_str()),
                    },
                    Field::Group { prefix, sub_fields } => PreviewField::Group {
                        prefix: prefix.clone(),
                        items: sub_fields.iter().map(|s| split(s.as_str())).collect(),
                    },
                })
                .collect(),
        })
        .collect();

    Preview::Document(PreviewDocument {
        title: template.title.clone(),
        sections,
        blank_count: counter,
        placeholder: settings.placeholder.clone(),
    })
}

fn spans(text: &str, marker: &str, counter: &mut usize) -> Vec<Span> {
    let mut out = Vec::new();
    for (i, segment) in text.split(marker).enumerate() {
        if i > 0 {
            *counter += 1;
            out.push(Span::Blank { number: *counter });
        }
        if !segment.is_empty() {
            out.push(Span::Text(segment.to_string()));
        }
    }
    out
}

impl PreviewDocument {
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        let title = if self.title.trim().is_empty() {
            "（未命名表单）"
        } else {
            self.title.as_str()
        };
        let _ = writeln!(out, "# {}", title);

        for (i, section) in self.sections.iter().enumerate() {
            let _ = writeln!(out);
            if section.title.trim().is_empty() {
                let _ = writeln!(out, "## 分区 {}", i + 1);
            } else {
                let _ = writeln!(out, "## {}", section.title);
            }
            for field in &section.fields {
                match field {
                    PreviewField::Text { spans } => {
                        let _ = writeln!(out, "{}", self.line(spans));
                    }
                    PreviewField::Group { prefix, items } => {
                        let _ = writeln!(out, "{}", prefix);
                        for item in items {
                            let _ = writeln!(out, "  - {}", self.line(item));
                        }
                    }
                }
            }
        }
        out
    }

    fn line(&self, spans: &[Span]) -> String {
        spans
            .iter()
            .map(|span| match span {
                Span::Text(t) => t.clone(),
                Span::Blank { number } => format!("({}){}", number, self.placeholder),
            })
            .collect()
    }
}
