use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 填空标记（作者在文本中插入的保留字符串）
    pub marker_token: String,
    /// 预览和题目上下文中显示的空位占位符
    pub blank_placeholder: String,
    /// 上下文被截断时使用的省略符
    pub ellipsis: String,
    /// 空位前后保留的上下文字符数
    pub context_window: usize,
    /// 编译后每道题的默认分值
    pub default_points: u32,
    /// 模板 JSON 存放目录
    pub template_folder: String,
    /// 编译结果输出目录
    pub output_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker_token: "[[BLANK]]".to_string(),
            blank_placeholder: "______".to_string(),
            ellipsis: "...".to_string(),
            context_window: 100,
            default_points: 1,
            template_folder: "templates".to_string(),
            output_folder: "output".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 默认配置叠加环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，环境变量优先
    ///
    /// 文件不存在时使用默认配置
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
            toml::from_str::<Config>(&content)
                .map_err(|e| {
                    AppError::File(FileError::TomlParseFailed {
                        path: path.display().to_string(),
                        source: Box::new(e),
                    })
                })?
                .with_env_overrides()
        } else {
            Self::from_env()
        };

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            marker_token: std::env::var("MARKER_TOKEN").unwrap_or(self.marker_token),
            blank_placeholder: std::env::var("BLANK_PLACEHOLDER").unwrap_or(self.blank_placeholder),
            ellipsis: std::env::var("CONTEXT_ELLIPSIS").unwrap_or(self.ellipsis),
            context_window: env_parse("CONTEXT_WINDOW").unwrap_or(self.context_window),
            default_points: env_parse("DEFAULT_POINTS").unwrap_or(self.default_points),
            template_folder: std::env::var("TEMPLATE_FOLDER").unwrap_or(self.template_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(self.output_folder),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    /// 校验配置
    ///
    /// 标记不能为空，占位符和省略符中不能包含标记，否则扫描结果不可重现
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker_token.is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        if self.default_points == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_points".to_string(),
                value: self.default_points.to_string(),
                reason: "分值至少为 1".to_string(),
            });
        }
        for (key, value) in [
            ("blank_placeholder", &self.blank_placeholder),
            ("ellipsis", &self.ellipsis),
        ] {
            if value.contains(&self.marker_token) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                    reason: format!("不能包含填空标记 {}", self.marker_token),
                });
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context_window, 100);
        assert_eq!(config.default_points, 1);
    }

    #[test]
    fn test_empty_marker_rejected() {
        let config = Config {
            marker_token: String::new(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyMarker)));
    }

    #[test]
    fn test_placeholder_containing_marker_rejected() {
        let config = Config {
            blank_placeholder: "<[[BLANK]]>".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("context_window = 20\nmarker_token = \"<blank>\"").unwrap();
        assert_eq!(config.context_window, 20);
        assert_eq!(config.marker_token, "<blank>");
        assert_eq!(config.blank_placeholder, "______");
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fill_blank_config_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_load_toml_file_with_env_override() {
        let path = temp_path("load.toml");
        std::fs::write(
            &path,
            "context_window = 20\nblank_placeholder = \"(  )\"\ntemplate_folder = \"from-file\"\n",
        )
        .unwrap();
        std::env::set_var("TEMPLATE_FOLDER", "from-env");

        let config = Config::load(&path).unwrap();
        std::env::remove_var("TEMPLATE_FOLDER");
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.context_window, 20);
        assert_eq!(config.blank_placeholder, "(  )");
        assert_eq!(config.template_folder, "from-env");
        assert_eq!(config.marker_token, "[[BLANK]]");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(temp_path("missing.toml")).unwrap();
        assert_eq!(config.marker_token, "[[BLANK]]");
        assert_eq!(config.context_window, 100);
        assert_eq!(config.default_points, 1);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = temp_path("invalid.toml");
        std::fs::write(&path, "default_points = 0\n").unwrap();
        let result = Config::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(AppError::Config(ConfigError::InvalidValue { .. }))));

        let path = temp_path("broken.toml");
        std::fs::write(&path, "context_window = [").unwrap();
        let result = Config::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(AppError::File(FileError::TomlParseFailed { .. }))));
    }
}
