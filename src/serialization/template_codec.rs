//! 模板 JSON 编解码
//!
//! 当前格式带版本号，每个字段都带 `kind` 类型标记：
//!
//! ```json
//! { "version": 1, "title": "T", "sections": [
//!   { "title": "S", "fields": [
//!     { "kind": "leaf", "text": "Name: [[BLANK]]" },
//!     { "kind": "group", "prefix": "Contact:", "subFields": ["Tel: [[BLANK]]"] }
//!   ] } ] }
//! ```
//!
//! 旧格式没有版本号，字段要么是字符串，要么是带 `items` 的对象，
//! 只通过 `deserialize_legacy` 导入，无法识别的形状直接报错而不是猜测。
//! `Template` 自身的 serde 输出没有版本号但字段带 `kind`，按当前格式读取。

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::TemplateError;
use crate::models::template::{Field, Section, Template};

/// 当前文档版本
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    #[serde(flatten)]
    template: &'a Template,
}

#[derive(Deserialize)]
struct Document {
    version: u32,
    #[serde(flatten)]
    template: Template,
}

/// 序列化模板
pub fn serialize(template: &Template) -> Result<String, TemplateError> {
    let doc = DocumentRef {
        version: DOCUMENT_VERSION,
        template,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// 反序列化当前格式的模板
pub fn deserialize(json: &str) -> Result<Template, TemplateError> {
    let doc: Document = serde_json::from_str(json)?;
    if doc.version != DOCUMENT_VERSION {
        return Err(TemplateError::UnsupportedVersion(doc.version));
    }
    Ok(doc.template)
}

/// 按文档内容自动选择格式
///
/// - 有 `version`：当前格式
/// - 没有 `version` 但字段带 `kind`：视为版本 1
/// - 其余按旧格式导入
pub fn deserialize_any(json: &str) -> Result<Template, TemplateError> {
    let value: JsonValue = serde_json::from_str(json)?;
    if value.get("version").is_some() {
        deserialize(json)
    } else if has_tagged_fields(&value) {
        Ok(serde_json::from_value(value)?)
    } else {
        legacy_from_value(&value)
    }
}

fn has_tagged_fields(value: &JsonValue) -> bool {
    value
        .get("sections")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
        .filter_map(|section| section.get("fields").and_then(JsonValue::as_array))
        .flatten()
        .any(|field| field.get("kind").is_some())
}

/// 导入旧格式模板
pub fn deserialize_legacy(json: &str) -> Result<Template, TemplateError> {
    let value: JsonValue = serde_json::from_str(json)?;
    legacy_from_value(&value)
}

fn legacy_from_value(value: &JsonValue) -> Result<Template, TemplateError> {
    let root = value
        .as_object()
        .ok_or_else(|| TemplateError::MalformedDocument("根节点必须是对象".to_string()))?;

    let title = optional_string(root.get("title"), "title")?;
    let sections = match root.get("sections") {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, s)| legacy_section(i, s))
            .collect::<Result<_, _>>()?,
        Some(_) => {
            return Err(TemplateError::MalformedDocument(
                "sections 必须是数组".to_string(),
            ))
        }
    };

    Ok(Template { title, sections })
}

fn legacy_section(index: usize, value: &JsonValue) -> Result<Section, TemplateError> {
    let obj = value.as_object().ok_or_else(|| {
        TemplateError::MalformedDocument(format!("分区 {} 必须是对象", index))
    })?;

    let title = optional_string(obj.get("title"), "section.title")?;
    let fields = match obj.get("fields") {
        None | Some(JsonValue::Null) => Vec::new(),
        Some(JsonValue::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(f, v)| legacy_field(index, f, v))
            .collect::<Result<_, _>>()?,
        Some(_) => {
            return Err(TemplateError::MalformedDocument(format!(
                "分区 {} 的 fields 必须是数组",
                index
            )))
        }
    };

    Ok(Section { title, fields })
}

fn legacy_field(section: usize, field: usize, value: &JsonValue) -> Result<Field, TemplateError> {
    let unrecognized = |reason: &str| TemplateError::UnrecognizedField {
        section,
        field,
        reason: reason.to_string(),
    };

    match value {
        JsonValue::String(text) => Ok(Field::leaf(text.clone())),
        JsonValue::Object(obj) => {
            let items = obj
                .get("items")
                .and_then(JsonValue::as_array)
                .ok_or_else(|| unrecognized("对象字段缺少 items 数组"))?;

            let sub_fields = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| unrecognized("items 中只能包含字符串"))?;

            let prefix = ["prefix", "title", "label"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(JsonValue::as_str))
                .unwrap_or_default();

            Ok(Field::group(prefix, sub_fields))
        }
        _ => Err(unrecognized("字段必须是字符串或带 items 的对象")),
    }
}

fn optional_string(value: Option<&JsonValue>, key: &str) -> Result<String, TemplateError> {
    match value {
        None | Some(JsonValue::Null) => Ok(String::new()),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(TemplateError::MalformedDocument(format!(
            "{} 必须是字符串",
            key
        ))),
    }
}
