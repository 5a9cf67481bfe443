use crate::utils::cipher::CipherError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OnePagerError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No profile found for employee '{employee_id}'")]
    NotFoundError { employee_id: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Cipher error: {0}")]
    CipherError(#[from] CipherError),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Template,
    Cipher,
    Upstream,
    Io,
}

pub type Result<T> = std::result::Result<T, OnePagerError>;

impl OnePagerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::TemplateError {
            message: message.into(),
        }
    }

    pub fn not_found(employee_id: impl Into<String>) -> Self {
        Self::NotFoundError {
            employee_id: employee_id.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::NotFoundError { .. } => ErrorCategory::NotFound,
            Self::TemplateError { .. } | Self::ZipError(_) => ErrorCategory::Template,
            Self::CipherError(_) => ErrorCategory::Cipher,
            Self::ApiError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Upstream
            }
            Self::IoError(_) => ErrorCategory::Io,
        }
    }

    /// 呼叫端造成的錯誤 (請求或設定不正確)，其餘歸屬於伺服器端
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::Configuration | ErrorCategory::NotFound
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFoundError { employee_id } => {
                format!("Employee '{}' does not exist", employee_id)
            }
            Self::ValidationError { message } => format!("Invalid request: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            Self::TemplateError { .. } | Self::ZipError(_) => {
                "The presentation template could not be processed".to_string()
            }
            Self::CipherError(_) => "The envelope could not be decrypted".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Pass at least one unique, well-formed employee id",
            ErrorCategory::Configuration => "Check the configuration file and command line flags",
            ErrorCategory::NotFound => "Verify the employee id exists in the profile source",
            ErrorCategory::Template => "Make sure the template is a valid .pptx package",
            ErrorCategory::Cipher => "Check the seed and that the envelope was not truncated",
            ErrorCategory::Upstream => "Check that the profile service is reachable and healthy",
            ErrorCategory::Io => "Check file permissions and that the paths exist",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Configuration => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Template | ErrorCategory::Io => 4,
            ErrorCategory::Cipher => 5,
            ErrorCategory::Upstream => 6,
        }
    }
}
