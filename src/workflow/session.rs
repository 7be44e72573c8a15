//! 编辑会话 - 流程层
//!
//! 状态机：
//!
//! ```text
//! Editing ──compile──▶ Compiled ──save──▶ Saved
//!    ▲                    │
//!    └──back_to_editing───┘   (丢弃全部题目和已填答案)
//! ```
//!
//! - 只有在 `Editing` 状态下才能修改模板结构
//! - 只有编译前置条件满足时才能进入 `Compiled`
//! - 只有所有题目都填写了答案才能进入 `Saved`
//! - 重新编译不是增量的：之前填写的答案全部清空，题号只按新的扫描顺序分配

use tracing::{info, warn};

use crate::compiler::QuestionCompiler;
use crate::config::Config;
use crate::editor::StructureEditor;
use crate::error::{AppError, SessionError};
use crate::models::question::QuestionRecord;
use crate::models::template::Template;
use crate::preview::{self, Preview};
use crate::serialization::{question_codec, template_codec, SavePayload};

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 编辑模板结构
    Editing,
    /// 已编译，只能编辑答案和分值
    Compiled { questions: Vec<QuestionRecord> },
    /// 已保存（终态）
    Saved,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Editing => "Editing",
            SessionState::Compiled { .. } => "Compiled",
            SessionState::Saved => "Saved",
        }
    }
}

/// 一次表单编辑会话，独占自己的模板
pub struct AuthoringSession {
    config: Config,
    compiler: QuestionCompiler,
    template: Template,
    state: SessionState,
    load_warning: Option<String>,
}

impl AuthoringSession {
    /// 创建新会话（空模板，`Editing` 状态）
    pub fn new(config: &Config) -> Self {
        Self::with_template(config, Template::default())
    }

    pub fn with_template(config: &Config, template: Template) -> Self {
        Self {
            config: config.clone(),
            compiler: QuestionCompiler::new(config),
            template,
            state: SessionState::Editing,
            load_warning: None,
        }
    }

    /// 从已保存的数据恢复会话
    ///
    /// - 模板 JSON 损坏：回退到空模板，记录一次加载警告
    /// - 题目列表有效且非空：直接进入 `Compiled` 状态
    /// - 题目列表无效：丢弃题目，停留在 `Editing`，记录加载警告
    pub fn hydrate(config: &Config, template_json: &str, questions_json: Option<&str>) -> Self {
        let template = match template_codec::deserialize_any(template_json) {
            Ok(template) => template,
            Err(e) => {
                let mut session = Self::new(config);
                session.warn_on_load(format!("模板加载失败，已回退为空模板: {}", e));
                return session;
            }
        };

        let mut session = Self::with_template(config, template);
        if let Some(json) = questions_json {
            match question_codec::decode_questions(json) {
                Ok(questions) if !questions.is_empty() => {
                    info!("✓ 已恢复 {} 道题目", questions.len());
                    session.state = SessionState::Compiled { questions };
                }
                Ok(_) => {}
                Err(e) => session.warn_on_load(format!("题目列表加载失败，需要重新编译: {}", e)),
            }
        }
        session
    }

    fn warn_on_load(&mut self, message: String) {
        warn!("⚠️ {}", message);
        self.load_warning = Some(message);
    }

    /// 取出加载警告（只返回一次）
    pub fn take_load_warning(&mut self) -> Option<String> {
        self.load_warning.take()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// 当前题目列表（仅 `Compiled` 状态）
    pub fn questions(&self) -> Option<&[QuestionRecord]> {
        match &self.state {
            SessionState::Compiled { questions } => Some(questions),
            _ => None,
        }
    }

    /// 获取结构编辑器（仅 `Editing` 状态）
    pub fn editor(&mut self) -> Result<StructureEditor<'_>, SessionError> {
        match self.state {
            SessionState::Editing => Ok(StructureEditor::new(
                &mut self.template,
                &self.config.marker_token,
            )),
            SessionState::Compiled { .. } => Err(SessionError::NotEditing),
            SessionState::Saved => Err(SessionError::AlreadySaved),
        }
    }

    /// 渲染当前模板的预览
    pub fn preview(&self) -> Preview {
        preview::render(&self.template, self.compiler.scanner().settings())
    }

    /// 编译模板并进入 `Compiled` 状态
    ///
    /// 前置条件不满足时状态不变
    pub fn compile(&mut self) -> Result<&[QuestionRecord], SessionError> {
        match self.state {
            SessionState::Editing => {}
            SessionState::Compiled { .. } => return Err(SessionError::NotEditing),
            SessionState::Saved => return Err(SessionError::AlreadySaved),
        }

        let questions = self.compiler.compile(&self.template).map_err(|e| {
            warn!("⚠️ 编译失败: {}", e);
            SessionError::from(e)
        })?;

        self.state = SessionState::Compiled { questions };
        Ok(self.questions().unwrap_or_default())
    }

    /// 返回编辑状态，丢弃所有题目（包括已填写的答案）
    pub fn back_to_editing(&mut self) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Compiled { questions } => {
                let answered = questions.iter().filter(|q| q.is_answered()).count();
                if answered > 0 {
                    warn!("⚠️ 返回编辑，丢弃 {} 个已填写的答案", answered);
                }
                self.state = SessionState::Editing;
                Ok(())
            }
            SessionState::Editing => Ok(()),
            SessionState::Saved => Err(SessionError::AlreadySaved),
        }
    }

    /// 填写答案
    pub fn set_answer(&mut self, order: u32, answer: impl Into<String>) -> Result<(), SessionError> {
        let question = self.question_mut(order)?;
        question.answer = answer.into();
        Ok(())
    }

    /// 修改分值（至少为 1）
    pub fn set_points(&mut self, order: u32, points: u32) -> Result<(), SessionError> {
        if points == 0 {
            return Err(SessionError::InvalidPoints { order, points });
        }
        let question = self.question_mut(order)?;
        question.points = points;
        Ok(())
    }

    /// 尚未填写答案的题号
    pub fn missing_answers(&self) -> Vec<u32> {
        self.questions()
            .unwrap_or_default()
            .iter()
            .filter(|q| !q.is_answered())
            .map(|q| q.order)
            .collect()
    }

    /// 生成保存载荷，状态不变
    ///
    /// 调用方完成实际的存储请求后再调用 `confirm_saved`；请求失败时会话仍处于
    /// `Compiled`，操作员可以重新保存
    pub fn payload(&self) -> Result<SavePayload, AppError> {
        let questions = match &self.state {
            SessionState::Compiled { questions } => questions,
            SessionState::Editing => return Err(SessionError::NotCompiled.into()),
            SessionState::Saved => return Err(SessionError::AlreadySaved.into()),
        };

        let missing = self.missing_answers();
        if !missing.is_empty() {
            warn!("⚠️ 还有 {} 道题未填写答案", missing.len());
            return Err(SessionError::IncompleteAnswers { missing }.into());
        }

        Ok(SavePayload::new(&self.template, questions.to_vec())?)
    }

    /// 存储成功后进入 `Saved` 终态
    pub fn confirm_saved(&mut self) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Compiled { questions } => {
                if questions.iter().any(|q| !q.is_answered()) {
                    return Err(SessionError::IncompleteAnswers {
                        missing: self.missing_answers(),
                    });
                }
                info!("✓ 表单已保存，共 {} 道题", questions.len());
                self.state = SessionState::Saved;
                Ok(())
            }
            SessionState::Editing => Err(SessionError::NotCompiled),
            SessionState::Saved => Err(SessionError::AlreadySaved),
        }
    }

    /// 生成载荷并直接进入 `Saved`
    pub fn save(&mut self) -> Result<SavePayload, AppError> {
        let payload = self.payload()?;
        self.confirm_saved()?;
        Ok(payload)
    }

    fn question_mut(&mut self, order: u32) -> Result<&mut QuestionRecord, SessionError> {
        match &mut self.state {
            SessionState::Compiled { questions } => {
                let total = questions.len();
                questions
                    .iter_mut()
                    .find(|q| q.order == order)
                    .ok_or(SessionError::UnknownQuestion { order, total })
            }
            SessionState::Editing => Err(SessionError::NotCompiled),
            SessionState::Saved => Err(SessionError::AlreadySaved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextTarget;
    use crate::error::CompileError;

    fn ready_session() -> AuthoringSession {
        let mut session = AuthoringSession::new(&Config::default());
        {
            let mut editor = session.editor().unwrap();
            editor.set_title("T");
            let s = editor.add_section();
            let f = editor.add_field(s).unwrap();
            editor.set_leaf_text(s, f, "Age: ");
            editor.insert_marker(TextTarget::Leaf { section: s, field: f });
        }
        session
    }

    #[test]
    fn test_compile_requires_preconditions() {
        let mut session = AuthoringSession::new(&Config::default());
        assert_eq!(
            session.compile().unwrap_err(),
            SessionError::Compile(CompileError::EmptyTitle)
        );
        assert_eq!(session.state(), &SessionState::Editing);
    }

    #[test]
    fn test_editor_locked_while_compiled() {
        let mut session = ready_session();
        session.compile().unwrap();
        assert!(matches!(session.editor(), Err(SessionError::NotEditing)));
        assert!(matches!(session.compile(), Err(SessionError::NotEditing)));
    }

    #[test]
    fn test_save_requires_all_answers() {
        let mut session = ready_session();
        session.compile().unwrap();
        assert!(matches!(
            session.save(),
            Err(AppError::Session(SessionError::IncompleteAnswers { ref missing })) if missing == &vec![1]
        ));
        assert_eq!(session.state().name(), "Compiled");

        session.set_answer(1, "18").unwrap();
        let payload = session.save().unwrap();
        assert_eq!(payload.questions[0].answer, "18");
        assert_eq!(payload.template().unwrap(), *session.template());
        assert_eq!(session.state(), &SessionState::Saved);
        assert!(matches!(session.editor(), Err(SessionError::AlreadySaved)));
    }

    #[test]
    fn test_answer_and_points_validation() {
        let mut session = ready_session();
        assert_eq!(session.set_answer(1, "x"), Err(SessionError::NotCompiled));
        session.compile().unwrap();
        assert_eq!(
            session.set_answer(2, "x"),
            Err(SessionError::UnknownQuestion { order: 2, total: 1 })
        );
        assert_eq!(
            session.set_points(1, 0),
            Err(SessionError::InvalidPoints { order: 1, points: 0 })
        );
        session.set_points(1, 3).unwrap();
        assert_eq!(session.questions().unwrap()[0].points, 3);
    }

    #[test]
    fn test_payload_keeps_session_retryable() {
        let mut session = ready_session();
        session.compile().unwrap();
        session.set_answer(1, "18").unwrap();
        let first = session.payload().unwrap();
        assert_eq!(session.state().name(), "Compiled");
        assert_eq!(session.payload().unwrap(), first);
        session.confirm_saved().unwrap();
        assert_eq!(session.confirm_saved(), Err(SessionError::AlreadySaved));
    }

    #[test]
    fn test_save_from_editing_is_rejected() {
        let mut session = ready_session();
        assert!(matches!(
            session.save(),
            Err(AppError::Session(SessionError::NotCompiled))
        ));
    }

    #[test]
    fn test_hydrate_malformed_falls_back_to_empty() {
        let mut session = AuthoringSession::hydrate(&Config::default(), "{not json", None);
        assert_eq!(session.template(), &Template::default());
        assert_eq!(session.state(), &SessionState::Editing);
        assert!(session.take_load_warning().is_some());
        assert!(session.take_load_warning().is_none());
    }

    #[test]
    fn test_hydrate_with_questions_enters_compiled() {
        let mut original = ready_session();
        original.compile().unwrap();
        original.set_answer(1, "18").unwrap();
        let payload = original.save().unwrap();

        let questions_json = payload.questions_json().unwrap();
        let mut session = AuthoringSession::hydrate(
            &Config::default(),
            &payload.template_json,
            Some(questions_json.as_str()),
        );
        assert!(session.take_load_warning().is_none());
        assert_eq!(session.questions().unwrap(), payload.questions.as_slice());
    }

    #[test]
    fn test_hydrate_unversioned_template() {
        let template = ready_session().template().clone();
        let json = serde_json::to_string(&template).unwrap();

        let mut session = AuthoringSession::hydrate(&Config::default(), &json, None);
        assert!(session.take_load_warning().is_none());
        assert_eq!(session.template(), &template);
        assert_eq!(session.compile().unwrap().len(), 1);
    }

    #[test]
    fn test_hydrate_invalid_questions_stays_editing() {
        let template_json = template_codec::serialize(&Template::new("T")).unwrap();
        let mut session = AuthoringSession::hydrate(
            &Config::default(),
            &template_json,
            Some(r#"[{"order":2,"points":1,"promptContext":"a","answer":""}]"#),
        );
        assert_eq!(session.state(), &SessionState::Editing);
        assert_eq!(session.template().title, "T");
        assert!(session.take_load_warning().is_some());
    }
}
