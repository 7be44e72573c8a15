//! 序列化边界
//!
//! - `template_codec` - 模板树 ↔ JSON（带显式类型标记，另支持旧格式导入）
//! - `question_codec` - 题目记录 ↔ 外部评分服务格式，以及保存载荷

pub mod question_codec;
pub mod template_codec;

pub use question_codec::{decode_questions, encode_questions, SavePayload};
pub use template_codec::{deserialize, deserialize_any, deserialize_legacy, serialize};
