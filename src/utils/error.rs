use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No account found for mobile number {mobile_number}")]
    AccountNotFound { mobile_number: String },

    #[error("Account store error: {message}")]
    StorageError { message: String },

    #[error("Request timed out after {millis}ms")]
    Timeout { millis: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Lookup,
    Network,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AssistError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::AccountNotFound { .. } => ErrorCategory::Lookup,
            Self::Timeout { .. } => ErrorCategory::Network,
            Self::CsvError(_) | Self::IoError(_) | Self::StorageError { .. } => {
                ErrorCategory::Storage
            }
            Self::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Internal => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::AccountNotFound { mobile_number } => format!(
                "No account found for mobile number {}. Please check your number.",
                mobile_number
            ),
            Self::Timeout { .. } => {
                "The assistant took too long to answer. Please try again.".to_string()
            }
            Self::CsvError(_) | Self::IoError(_) | Self::StorageError { .. } => {
                "Database connection failed".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
            Self::SerializationError(_) => "Failed to format the response.".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Check the input and try again",
            Self::AccountNotFound { .. } => "Verify the registered 10-digit mobile number",
            Self::Timeout { .. } => "Retry later or raise --timeout-seconds",
            Self::CsvError(_) | Self::IoError(_) | Self::StorageError { .. } => {
                "Make sure the accounts CSV exists and has the expected header"
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Fix the configuration value and rerun",
            Self::SerializationError(_) => "Report this as a bug",
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistError>;
