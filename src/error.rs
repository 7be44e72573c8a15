use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 模板结构错误（加载 / 反序列化）
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),
    /// 编译前置条件不满足
    #[error("编译错误: {0}")]
    Compile(#[from] CompileError),
    /// 会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 题目列表错误
    #[error("题目错误: {0}")]
    Question(#[from] QuestionError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 模板结构错误
///
/// 只在加载时出现一次，会话随后回退到空模板
#[derive(Debug, Error)]
pub enum TemplateError {
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: serde_json::Error,
    },
    /// 旧格式中某个字段的形状无法识别
    #[error("无法识别的字段 (分区 {section}, 字段 {field}): {reason}")]
    UnrecognizedField {
        section: usize,
        field: usize,
        reason: String,
    },
    /// 旧格式文档结构错误
    #[error("文档结构错误: {0}")]
    MalformedDocument(String),
    /// 不支持的文档版本
    #[error("不支持的文档版本: {0}")]
    UnsupportedVersion(u32),
}

/// 编译前置条件错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// 标题为空
    #[error("请先填写表单标题")]
    EmptyTitle,
    /// 没有分区
    #[error("请至少添加一个分区")]
    NoSections,
    /// 没有任何填空标记
    #[error("模板中没有任何填空标记，请至少插入一个空位")]
    NoBlanks,
}

/// 会话状态错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 当前不在编辑状态
    #[error("当前不在编辑状态，请先返回编辑")]
    NotEditing,
    /// 当前不在已编译状态
    #[error("模板尚未编译")]
    NotCompiled,
    /// 已保存，会话结束
    #[error("表单已保存，会话已结束")]
    AlreadySaved,
    /// 存在未填写答案的题目
    #[error("以下题目尚未填写答案: {missing:?}")]
    IncompleteAnswers { missing: Vec<u32> },
    /// 题号不存在
    #[error("题号 {order} 不存在 (共 {total} 题)")]
    UnknownQuestion { order: u32, total: usize },
    /// 分值无效
    #[error("题目 {order} 的分值 {points} 无效，分值至少为 1")]
    InvalidPoints { order: u32, points: u32 },
    /// 编译失败
    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// 题目列表错误（加载已保存的题目时）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// 题号不连续
    #[error("题号不连续: 位置 {position} 期望 {expected}，实际为 {found}")]
    OrderGap {
        position: usize,
        expected: u32,
        found: u32,
    },
    /// 分值无效
    #[error("题目 {order} 的分值为 0")]
    ZeroPoints { order: u32 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 填空标记为空
    #[error("填空标记不能为空")]
    EmptyMarker,
    /// 配置值无效
    #[error("配置项 {key} 的值 '{value}' 无效: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for TemplateError {
    fn from(source: serde_json::Error) -> Self {
        TemplateError::JsonParseFailed { source }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Template(err.into())
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
