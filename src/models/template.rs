//! 表单模板树
//!
//! 标题 → 分区 → 字段 → 子字段。所有修改都通过 `editor::StructureEditor` 完成，
//! 这里只提供结构访问器，扫描和预览都是这棵树的纯函数。

use serde::{Deserialize, Serialize};

/// 表单模板（根节点）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// 分区，在模板中的顺序决定题号的首要排序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// 字段：显式标记的二选一变体，从不根据形状推断
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Field {
    /// 单行文本，可以包含任意数量的填空标记
    Leaf { text: String },
    /// 带标签的分组，每个子字段独立扫描；前缀只作标签，不扫描
    #[serde(rename_all = "camelCase")]
    Group {
        prefix: String,
        sub_fields: Vec<String>,
    },
}

impl Default for Field {
    fn default() -> Self {
        Field::leaf("")
    }
}

impl Field {
    pub fn leaf(text: impl Into<String>) -> Self {
        Field::Leaf { text: text.into() }
    }

    pub fn group(prefix: impl Into<String>, sub_fields: Vec<String>) -> Self {
        Field::Group {
            prefix: prefix.into(),
            sub_fields,
        }
    }

    /// 返回该字段中需要扫描的文本
    ///
    /// 叶子字段返回 `(None, text)`，分组返回每个 `(Some(i), sub_field)`
    pub fn scan_targets(&self) -> Vec<(Option<usize>, &str)> {
        match self {
            Field::Leaf { text } => vec![(None, text.as_str())],
            Field::Group { sub_fields, .. } => sub_fields
                .iter()
                .enumerate()
                .map(|(i, s)| (Some(i), s.as_str()))
                .collect(),
        }
    }

    /// 分组前缀（叶子字段没有）
    pub fn label(&self) -> Option<&str> {
        match self {
            Field::Leaf { .. } => None,
            Field::Group { prefix, .. } => Some(prefix.as_str()),
        }
    }
}

impl Template {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn field(&self, section: usize, field: usize) -> Option<&Field> {
        self.sections.get(section)?.fields.get(field)
    }

    /// 模板是否完全为空（无标题、分区中也没有任何内容）
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
            && self
                .sections
                .iter()
                .all(|s| s.title.trim().is_empty() && s.fields.is_empty())
    }

    /// 字段总数（含分组本身，不含子字段）
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}

impl Section {
    pub fn new(title: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}
