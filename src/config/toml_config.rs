use crate::core::ConfigProvider;
use crate::domain::model::{
    DEFAULT_ANONYMIZED_NAME, DEFAULT_AVATAR_PART, DEFAULT_BUNDLE_FILENAME,
    DEFAULT_DOCUMENT_EXTENSION, DEFAULT_MAX_AVATAR_BYTES, DEFAULT_SLIDE_PREFIX,
};
use crate::utils::error::{OnePagerError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub template: TemplateConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub anonymization: Option<AnonymizationConfig>,
    pub avatar: Option<AvatarConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub path: String,
    pub slide_prefix: Option<String>,
    pub avatar_part: Option<String>,
    pub cache: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Local,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: SourceType,
    /// Root of `profiles/` and `avatars/` for the local source
    pub base_path: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    pub bundle_filename: Option<String>,
    pub document_extension: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OnePagerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| OnePagerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("template.path", &self.template.path)?;
        validate_file_extension("template.path", &self.template.path, &["pptx"])?;
        if let Some(prefix) = &self.template.slide_prefix {
            validate_non_empty_string("template.slide_prefix", prefix)?;
        }
        if let Some(part) = &self.template.avatar_part {
            validate_non_empty_string("template.avatar_part", part)?;
        }

        match self.source.r#type {
            SourceType::Local => {
                let base = validate_required_field("source.base_path", &self.source.base_path)?;
                validate_path("source.base_path", base)?;
            }
            SourceType::Http => {
                let endpoint = validate_required_field("source.endpoint", &self.source.endpoint)?;
                validate_url("source.endpoint", endpoint)?;
            }
        }
        if let Some(timeout) = self.source.timeout_seconds {
            validate_range("source.timeout_seconds", timeout, 1, 300)?;
        }

        validate_path("output.output_path", &self.output.output_path)?;
        if let Some(name) = &self.output.bundle_filename {
            validate_file_extension("output.bundle_filename", name, &["zip"])?;
        }

        if let Some(anonymization) = &self.anonymization {
            validate_non_empty_string("anonymization.display_name", &anonymization.display_name)?;
        }

        if let Some(avatar) = &self.avatar {
            validate_positive_number("avatar.max_bytes", avatar.max_bytes, 1)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !matches!(format, "compact" | "json") {
                return Err(OnePagerError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Supported formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f == "json")
            .unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn template_path(&self) -> &str {
        &self.template.path
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn slide_prefix(&self) -> &str {
        self.template
            .slide_prefix
            .as_deref()
            .unwrap_or(DEFAULT_SLIDE_PREFIX)
    }

    fn avatar_part(&self) -> &str {
        self.template
            .avatar_part
            .as_deref()
            .unwrap_or(DEFAULT_AVATAR_PART)
    }

    fn anonymized_name(&self) -> &str {
        self.anonymization
            .as_ref()
            .map(|a| a.display_name.as_str())
            .unwrap_or(DEFAULT_ANONYMIZED_NAME)
    }

    fn document_extension(&self) -> &str {
        self.output
            .document_extension
            .as_deref()
            .unwrap_or(DEFAULT_DOCUMENT_EXTENSION)
    }

    fn bundle_filename(&self) -> &str {
        self.output
            .bundle_filename
            .as_deref()
            .unwrap_or(DEFAULT_BUNDLE_FILENAME)
    }

    fn cache_template(&self) -> bool {
        self.template.cache.unwrap_or(true)
    }

    fn max_avatar_bytes(&self) -> usize {
        self.avatar
            .as_ref()
            .map(|a| a.max_bytes)
            .unwrap_or(DEFAULT_MAX_AVATAR_BYTES)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
