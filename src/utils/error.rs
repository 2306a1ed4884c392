use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnipeError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("No opportunity: {message}")]
    NoOpportunity { message: String },

    #[error("Text generator is not configured")]
    GeneratorUnavailable,

    #[error("Text generation failed: {message}")]
    GeneratorError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Storage key '{key}' points outside the storage root")]
    InvalidStorageKey { key: String },

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] askama::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Configuration,
    Request,
    Generation,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnipeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnipeError::HttpError(_) => ErrorCategory::Network,
            AnipeError::IoError(_) => ErrorCategory::Io,
            AnipeError::ZipError(_)
            | AnipeError::CsvError(_)
            | AnipeError::SerializationError(_)
            | AnipeError::TemplateError(_) => ErrorCategory::Data,
            AnipeError::ConfigError { .. }
            | AnipeError::MissingConfigError { .. }
            | AnipeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AnipeError::BadRequest { .. } | AnipeError::NoOpportunity { .. } => {
                ErrorCategory::Request
            }
            AnipeError::GeneratorUnavailable | AnipeError::GeneratorError { .. } => {
                ErrorCategory::Generation
            }
            AnipeError::StorageError { .. } | AnipeError::InvalidStorageKey { .. } => {
                ErrorCategory::Storage
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 生成失敗時會改用預設內容
            AnipeError::GeneratorUnavailable => ErrorSeverity::Low,
            AnipeError::HttpError(_) | AnipeError::GeneratorError { .. } => ErrorSeverity::Medium,
            AnipeError::BadRequest { .. }
            | AnipeError::NoOpportunity { .. }
            | AnipeError::InvalidStorageKey { .. }
            | AnipeError::ZipError(_)
            | AnipeError::CsvError(_)
            | AnipeError::SerializationError(_)
            | AnipeError::TemplateError(_) => ErrorSeverity::High,
            AnipeError::IoError(_)
            | AnipeError::StorageError { .. }
            | AnipeError::ConfigError { .. }
            | AnipeError::MissingConfigError { .. }
            | AnipeError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// HTTP 服務用：請求本身有問題時回 400
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnipeError::BadRequest { .. }
                | AnipeError::InvalidConfigValueError { .. }
                | AnipeError::InvalidStorageKey { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the remote endpoint, then retry",
            ErrorCategory::Io => "Check that the output directory exists and is writable",
            ErrorCategory::Data => "Inspect the generated data for malformed content",
            ErrorCategory::Configuration => {
                "Review anipe.toml and the environment variables it references"
            }
            ErrorCategory::Request => "Check the request payload for the required fields",
            ErrorCategory::Generation => "Verify GEMINI_API_KEY and the selected model",
            ErrorCategory::Storage => "Verify bucket name, region and credentials",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AnipeError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            AnipeError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            AnipeError::BadRequest { message } | AnipeError::NoOpportunity { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AnipeError::BadRequest {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        AnipeError::StorageError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnipeError>;
