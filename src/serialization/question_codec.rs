//! 题目记录编解码
//!
//! 题目原样交给外部评分 / 存储服务：`[{order, points, promptContext, answer}]`。
//! 加载已保存的题目时校验题号连续、分值有效。

use serde::{Deserialize, Serialize};

use crate::error::{AppResult, QuestionError, TemplateError};
use crate::models::question::QuestionRecord;
use crate::models::template::Template;

use super::template_codec;

/// 保存时交给调用方的两份载荷
///
/// 调用方负责实际的网络 / 存储请求、重试策略和错误展示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    /// 序列化后的模板，供以后重新编辑
    pub template_json: String,
    /// 最终题目列表，供评分使用
    pub questions: Vec<QuestionRecord>,
}

impl SavePayload {
    pub fn new(template: &Template, questions: Vec<QuestionRecord>) -> Result<Self, TemplateError> {
        Ok(Self {
            template_json: template_codec::serialize(template)?,
            questions,
        })
    }

    pub fn questions_json(&self) -> serde_json::Result<String> {
        encode_questions(&self.questions)
    }

    /// 还原模板（保存载荷中的模板一定是当前格式）
    pub fn template(&self) -> Result<Template, TemplateError> {
        template_codec::deserialize(&self.template_json)
    }
}

pub fn encode_questions(questions: &[QuestionRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(questions)
}

/// 解析并校验题目列表
pub fn decode_questions(json: &str) -> AppResult<Vec<QuestionRecord>> {
    let questions: Vec<QuestionRecord> = serde_json::from_str(json)?;
    validate_questions(&questions)?;
    Ok(questions)
}

/// 题号必须恰好为 1..=N，分值至少为 1
pub fn validate_questions(questions: &[QuestionRecord]) -> Result<(), QuestionError> {
    for (position, (question, expected)) in questions.iter().zip(1u32..).enumerate() {
        if question.order != expected {
            return Err(QuestionError::OrderGap {
                position,
                expected,
                found: question.order,
            });
        }
        if question.points == 0 {
            return Err(QuestionError::ZeroPoints {
                order: question.order,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_external_field_names() {
        let mut q = QuestionRecord::new(1, 2, "a ___ b");
        q.answer = "x".into();
        let json = encode_questions(&[q]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["order"], 1);
        assert_eq!(value[0]["points"], 2);
        assert_eq!(value[0]["promptContext"], "a ___ b");
        assert_eq!(value[0]["answer"], "x");
    }

    #[test]
    fn test_decode_rejects_gaps_and_zero_points() {
        let gap = r#"[{"order":1,"points":1,"promptContext":"a","answer":""},
                      {"order":3,"points":1,"promptContext":"b","answer":""}]"#;
        assert!(matches!(
            decode_questions(gap),
            Err(AppError::Question(QuestionError::OrderGap { position: 1, expected: 2, found: 3 }))
        ));

        let zero = r#"[{"order":1,"points":0,"promptContext":"a","answer":""}]"#;
        assert!(matches!(
            decode_questions(zero),
            Err(AppError::Question(QuestionError::ZeroPoints { order: 1 }))
        ));
    }

    #[test]
    fn test_missing_answer_defaults_to_empty() {
        let json = r#"[{"order":1,"points":1,"promptContext":"a"}]"#;
        let questions = decode_questions(json).unwrap();
        assert_eq!(questions[0].answer, "");
    }
}
