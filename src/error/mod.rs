use std::fmt::Display;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for the payroll report service
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Source unavailable: {message}")]
    Unavailable {
        code: u16,
        message: String,
        resource: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Fetch failed: {message}")]
    Fetch {
        code: u16,
        message: String,
        target: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Internal error: {message}")]
    Internal {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ReportError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create an unavailable-source error with default code
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            code: ErrorCode::SOURCE_UNAVAILABLE,
            message: message.into(),
            resource: None,
            source: None,
        }
    }

    /// Create an unavailable-source error naming the resource that failed
    pub fn unavailable_with_code(
        code: u16,
        message: impl Into<String>,
        resource: Option<String>,
    ) -> Self {
        Self::Unavailable {
            code,
            message: message.into(),
            resource,
            source: None,
        }
    }

    /// Create a fetch error with default code
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            code: ErrorCode::FETCH_GENERIC,
            message: message.into(),
            target: None,
            source: None,
        }
    }

    /// Create a fetch error with specific code and target
    pub fn fetch_with_code(code: u16, message: impl Into<String>, target: Option<String>) -> Self {
        Self::Fetch {
            code,
            message: message.into(),
            target,
            source: None,
        }
    }

    /// Create a validation error with default code
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::VALIDATION_GENERIC,
            message: message.into(),
            field: None,
            source: None,
        }
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Create an internal error with default code
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::INTERNAL_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with specific code
    pub fn internal_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Internal {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Unavailable { source: src, .. }
            | Self::Fetch { source: src, .. }
            | Self::Validation { source: src, .. }
            | Self::Internal { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Unavailable { message, .. }
            | Self::Fetch { message, .. }
            | Self::Validation { message, .. }
            | Self::Internal { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Unavailable { code, .. }
            | Self::Fetch { code, .. }
            | Self::Validation { code, .. }
            | Self::Internal { code, .. } => *code,
        }
    }

    /// The bare message, without code prefix or category
    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::Unavailable { message, .. }
            | Self::Fetch { message, .. }
            | Self::Validation { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    /// Stable category name, shown in the system error document
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ConfigurationError",
            Self::Unavailable { .. } => "SourceUnavailableError",
            Self::Fetch { .. } => "FetchError",
            Self::Validation { .. } => "ValidationError",
            Self::Internal { .. } => "InternalError",
        }
    }

    /// Whether the organization source reported itself unavailable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::Unavailable {
                message, resource, ..
            } => match resource {
                Some(r) => format!("{} is unavailable: {}", r, message),
                None => format!("Data source unavailable: {}", message),
            },
            Self::Fetch {
                message, target, ..
            } => match target {
                Some(t) => format!("Fetching {} failed: {}", t, message),
                None => format!("Fetch failed: {}", message),
            },
            Self::Validation { message, field, .. } => match field {
                Some(f) => format!("Validation error for '{}': {}", f, message),
                None => format!("Validation error: {}", message),
            },
            Self::Internal { message, .. } => message.clone(),
        }
    }
}

/// Type alias for Results using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;

/// Type alias for application Results (using anyhow for flexibility)
pub type AppResult<T> = anyhow::Result<T>;

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::internal_with_code(ErrorCode::INTERNAL_IO, "I/O operation failed")
            .with_source(err)
    }
}

impl From<toml::de::Error> for ReportError {
    fn from(err: toml::de::Error) -> Self {
        ReportError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax")
            .with_source(err)
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        let target = err.url().map(|u| u.to_string());
        let (code, message) = if err.is_timeout() {
            (ErrorCode::FETCH_TIMEOUT, "Request timed out".to_string())
        } else if let Some(status) = err.status() {
            (
                ErrorCode::FETCH_HTTP_STATUS,
                format!("Service responded with status {}", status),
            )
        } else {
            (ErrorCode::FETCH_TRANSPORT, "Request failed".to_string())
        };

        ReportError::fetch_with_code(code, message, target).with_source(err)
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for ReportError {
    fn from(err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut => {
                ErrorCode::SOURCE_CONNECTION_FAILED
            }
            _ => ErrorCode::SOURCE_QUERY_FAILED,
        };
        ReportError::unavailable_with_code(code, "Database operation failed", None)
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation_and_chaining() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ReportError::unavailable("Cannot list departments")
            .with_source(io_err)
            .with_context("while generating report");

        assert_eq!(err.code(), ErrorCode::SOURCE_UNAVAILABLE);
        assert!(err.to_string().contains("[E2000]"));
        assert!(err.user_message().contains("Cannot list departments"));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ReportError::config("x").category(), "ConfigurationError");
        assert_eq!(
            ReportError::unavailable("x").category(),
            "SourceUnavailableError"
        );
        assert_eq!(ReportError::fetch("x").category(), "FetchError");
        assert_eq!(ReportError::validation("x").category(), "ValidationError");
        assert_eq!(ReportError::internal("x").category(), "InternalError");
    }

    #[test]
    fn test_message_excludes_code_prefix() {
        let err = ReportError::internal("boom").with_context("department IT");
        assert_eq!(err.message(), "boom: department IT");
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ReportError = std::io::Error::other("disk").into();
        assert_eq!(err.code(), ErrorCode::INTERNAL_IO);
        assert_eq!(err.category(), "InternalError");
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Table, _> = toml::from_str("not = = toml");
        let err: ReportError = parse.unwrap_err().into();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_TOML);
    }

    #[test]
    fn test_user_message_with_field() {
        let err = ReportError::validation_with_code(
            ErrorCode::VALIDATION_OUT_OF_RANGE,
            "Month must be between 1 and 12",
            Some("month".to_string()),
        );
        assert_eq!(
            err.user_message(),
            "Validation error for 'month': Month must be between 1 and 12"
        );
    }
}
