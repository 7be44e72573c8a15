use serde::{Deserialize, Serialize};

/// 空位在模板中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlankLocation {
    pub section: usize,
    pub field: usize,
    /// 分组字段中的子字段索引；叶子字段为 None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_field: Option<usize>,
    /// 该空位在所在文本中的序号（从 0 开始，从左到右）
    pub occurrence: usize,
}

impl std::fmt::Display for BlankLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sub_field {
            Some(sub) => write!(
                f,
                "[分区#{} 字段#{} 子字段#{} 空位#{}]",
                self.section, self.field, sub, self.occurrence
            ),
            None => write!(
                f,
                "[分区#{} 字段#{} 空位#{}]",
                self.section, self.field, self.occurrence
            ),
        }
    }
}

/// 一次填空标记的出现，附带截断后的上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOccurrence {
    pub location: BlankLocation,
    /// 分组前缀（只作标签，不参与上下文）
    pub label: Option<String>,
    /// 空位前的文本（已截断，截断时带省略符前缀）
    pub before: String,
    /// 空位后的文本（已截断，截断时带省略符后缀）
    pub after: String,
    pub before_truncated: bool,
    pub after_truncated: bool,
}

impl MarkerOccurrence {
    /// 渲染题目上下文：`before + 占位符 + after`
    pub fn context(&self, placeholder: &str) -> String {
        let mut out = String::with_capacity(self.before.len() + placeholder.len() + self.after.len());
        out.push_str(&self.before);
        out.push_str(placeholder);
        out.push_str(&self.after);
        out
    }
}

/// 编译后的题目记录
///
/// 交给外部评分 / 存储服务的格式为 `{order, points, promptContext, answer}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// 题号（从 1 开始）
    pub order: u32,
    /// 分值（至少为 1）
    pub points: u32,
    pub prompt_context: String,
    #[serde(default)]
    pub answer: String,
}

impl QuestionRecord {
    pub fn new(order: u32, points: u32, prompt_context: impl Into<String>) -> Self {
        Self {
            order,
            points,
            prompt_context: prompt_context.into(),
            answer: String::new(),
        }
    }

    /// 答案是否已填写（空白字符不算）
    pub fn is_answered(&self) -> bool {
        !self.answer.trim().is_empty()
    }
}
