//! # Fill Blank Form
//!
//! 填空题表单编译器：编辑人员搭建嵌套的表单模板（标题 → 分区 → 字段 → 子字段），
//! 在文本中插入填空标记，再将模板确定性地编译为有序的题目记录。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 模板树（`Template` / `Section` / `Field`）与题目记录
//! - `models/loaders` - 从磁盘加载模板 JSON
//!
//! ### ② 能力层（Capabilities）
//! - `editor/` - 结构编辑器，模板树唯一的修改入口
//! - `scanner/` - 填空扫描器，按固定顺序找出所有标记及上下文
//! - `compiler/` - 题目编译器，扫描结果 → 题目记录
//! - `preview/` - 预览渲染，仅供操作员查看
//! - `serialization/` - 模板与题目的 JSON 编解码
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 编辑会话状态机（Editing → Compiled → Saved）
//!
//! ### ④ 编排层（Orchestration）
//! - `services/` - 载荷存储
//! - `app` - 批量编译模板目录
//!
//! ## 模块结构

pub mod app;
pub mod compiler;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod preview;
pub mod scanner;
pub mod serialization;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, CompileStats};
pub use compiler::QuestionCompiler;
pub use config::Config;
pub use editor::{Direction, StructureEditor, TextTarget};
pub use error::{AppError, AppResult};
pub use models::{Field, MarkerOccurrence, QuestionRecord, Section, Template};
pub use preview::Preview;
pub use scanner::{BlankScanner, ScanSettings};
pub use serialization::SavePayload;
pub use services::PayloadStore;
pub use workflow::{AuthoringSession, SessionState};
