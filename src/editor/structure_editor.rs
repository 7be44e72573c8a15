//! 结构编辑器 - 模板树的唯一修改入口
//!
//! 所有操作都用 `(分区索引, 字段索引[, 子字段索引])` 定位节点。
//! 索引越界说明 UI 与模板状态不同步，而不是操作员错误，
//! 因此一律作为无操作处理并返回 `false`，从不报错。

use tracing::debug;

use crate::models::template::{Field, Section, Template};

/// 移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// 插入填空标记的目标文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    /// 叶子字段的文本
    Leaf { section: usize, field: usize },
    /// 分组字段的某个子字段
    SubField {
        section: usize,
        field: usize,
        sub_field: usize,
    },
}

/// 结构编辑器
///
/// 借用模板的可变引用，生命周期内独占模板
pub struct StructureEditor<'a> {
    template: &'a mut Template,
    marker: &'a str,
}

impl<'a> StructureEditor<'a> {
    pub fn new(template: &'a mut Template, marker: &'a str) -> Self {
        Self { template, marker }
    }

    pub fn template(&self) -> &Template {
        &*self.template
    }

    // ========== 文本编辑 ==========

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.template.title = title.into();
    }

    pub fn set_section_title(&mut self, section: usize, title: impl Into<String>) -> bool {
        match self.template.sections.get_mut(section) {
            Some(s) => {
                s.title = title.into();
                true
            }
            None => noop("set_section_title", section, None),
        }
    }

    /// 修改叶子字段文本；目标是分组时为无操作
    pub fn set_leaf_text(&mut self, section: usize, field: usize, text: impl Into<String>) -> bool {
        match self.field_mut(section, field) {
            Some(Field::Leaf { text: t }) => {
                *t = text.into();
                true
            }
            _ => noop("set_leaf_text", section, Some(field)),
        }
    }

    pub fn set_group_prefix(&mut self, section: usize, field: usize, prefix: impl Into<String>) -> bool {
        match self.field_mut(section, field) {
            Some(Field::Group { prefix: p, .. }) => {
                *p = prefix.into();
                true
            }
            _ => noop("set_group_prefix", section, Some(field)),
        }
    }

    pub fn set_sub_field_text(
        &mut self,
        section: usize,
        field: usize,
        sub_field: usize,
        text: impl Into<String>,
    ) -> bool {
        match self.sub_field_mut(section, field, sub_field) {
            Some(s) => {
                *s = text.into();
                true
            }
            None => noop("set_sub_field_text", section, Some(field)),
        }
    }

    // ========== 分区操作 ==========

    /// 追加一个空分区，返回其索引
    pub fn add_section(&mut self) -> usize {
        self.template.sections.push(Section::default());
        self.template.sections.len() - 1
    }

    /// 删除分区（调用前由操作员确认，不可撤销）
    pub fn remove_section(&mut self, section: usize) -> bool {
        if section >= self.template.sections.len() {
            return noop("remove_section", section, None);
        }
        self.template.sections.remove(section);
        true
    }

    /// 与相邻分区交换位置；在边界处为无操作
    pub fn move_section(&mut self, section: usize, direction: Direction) -> bool {
        let len = self.template.sections.len();
        match neighbour(section, len, direction) {
            Some(other) => {
                self.template.sections.swap(section, other);
                true
            }
            None => noop("move_section", section, None),
        }
    }

    // ========== 字段操作 ==========

    /// 在分区末尾追加一个空的叶子字段，返回其索引
    pub fn add_field(&mut self, section: usize) -> Option<usize> {
        let Some(s) = self.template.sections.get_mut(section) else {
            noop("add_field", section, None);
            return None;
        };
        s.fields.push(Field::default());
        Some(s.fields.len() - 1)
    }

    pub fn remove_field(&mut self, section: usize, field: usize) -> bool {
        match self.template.sections.get_mut(section) {
            Some(s) if field < s.fields.len() => {
                s.fields.remove(field);
                true
            }
            _ => noop("remove_field", section, Some(field)),
        }
    }

    /// 在分区内与相邻字段交换位置；在边界处为无操作
    pub fn move_field(&mut self, section: usize, field: usize, direction: Direction) -> bool {
        let Some(s) = self.template.sections.get_mut(section) else {
            return noop("move_field", section, Some(field));
        };
        match neighbour(field, s.fields.len(), direction) {
            Some(other) => {
                s.fields.swap(field, other);
                true
            }
            None => noop("move_field", section, Some(field)),
        }
    }

    /// 将叶子字段升级为分组，原文本成为第一个子字段
    pub fn promote_to_group(&mut self, section: usize, field: usize) -> bool {
        let Some(slot) = self.field_mut(section, field) else {
            return noop("promote_to_group", section, Some(field));
        };
        let Field::Leaf { text } = &mut *slot else {
            return noop("promote_to_group", section, Some(field));
        };
        let text = std::mem::take(text);
        *slot = Field::group("", vec![text]);
        true
    }

    /// 将分组降级为叶子字段
    ///
    /// 有损操作：文本取前缀（非空时），否则取第一个子字段，其余子字段被丢弃
    pub fn demote_to_leaf(&mut self, section: usize, field: usize) -> bool {
        let Some(slot) = self.field_mut(section, field) else {
            return noop("demote_to_leaf", section, Some(field));
        };
        let Field::Group { prefix, sub_fields } = &mut *slot else {
            return noop("demote_to_leaf", section, Some(field));
        };

        let text = if !prefix.is_empty() {
            std::mem::take(prefix)
        } else {
            sub_fields.first_mut().map(std::mem::take).unwrap_or_default()
        };
        if sub_fields.len() > 1 {
            debug!(
                "降级分组 [分区#{} 字段#{}]，丢弃 {} 个子字段",
                section,
                field,
                sub_fields.len() - 1
            );
        }
        *slot = Field::leaf(text);
        true
    }

    // ========== 子字段操作 ==========

    /// 在分组末尾追加一个空子字段，返回其索引
    pub fn add_sub_field(&mut self, section: usize, field: usize) -> Option<usize> {
        match self.field_mut(section, field) {
            Some(Field::Group { sub_fields, .. }) => {
                sub_fields.push(String::new());
                Some(sub_fields.len() - 1)
            }
            _ => {
                noop("add_sub_field", section, Some(field));
                None
            }
        }
    }

    pub fn remove_sub_field(&mut self, section: usize, field: usize, sub_field: usize) -> bool {
        match self.field_mut(section, field) {
            Some(Field::Group { sub_fields, .. }) if sub_field < sub_fields.len() => {
                sub_fields.remove(sub_field);
                true
            }
            _ => noop("remove_sub_field", section, Some(field)),
        }
    }

    // ========== 填空标记 ==========

    /// 在目标文本末尾追加一个填空标记和一个空格
    ///
    /// 重复调用会插入多个独立的标记
    pub fn insert_marker(&mut self, target: TextTarget) -> bool {
        let marker = self.marker;
        let slot = match target {
            TextTarget::Leaf { section, field } => match self.field_mut(section, field) {
                Some(Field::Leaf { text }) => Some(text),
                _ => None,
            },
            TextTarget::SubField {
                section,
                field,
                sub_field,
            } => self.sub_field_mut(section, field, sub_field),
        };

        match slot {
            Some(text) => {
                text.push_str(marker);
                text.push(' ');
                true
            }
            None => {
                debug!("insert_marker 目标不存在: {:?}", target);
                false
            }
        }
    }

    // ========== 内部辅助 ==========

    fn field_mut(&mut self, section: usize, field: usize) -> Option<&mut Field> {
        self.template.sections.get_mut(section)?.fields.get_mut(field)
    }

    fn sub_field_mut(&mut self, section: usize, field: usize, sub_field: usize) -> Option<&mut String> {
        match self.field_mut(section, field)? {
            Field::Group { sub_fields, .. } => sub_fields.get_mut(sub_field),
            Field::Leaf { .. } => None,
        }
    }
}

fn neighbour(index: usize, len: usize, direction: Direction) -> Option<usize> {
    if index >= len {
        return None;
    }
    match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => (index + 1 < len).then_some(index + 1),
    }
}

fn noop(op: &str, section: usize, field: Option<usize>) -> bool {
    debug!("{} 无操作: 分区 {} 字段 {:?} 不存在或类型不符", op, section, field);
    false
}
