//! Error types for the logger
//!
//! Logging calls never fail; these errors only come out of construction,
//! configuration and flushing.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Unknown level name
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The process-wide logger was already installed
    #[error("Global logger already initialized")]
    AlreadyInitialized,
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(name: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(name.into())
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_level("verbose");
        assert!(matches!(err, LoggerError::InvalidLevel(_)));

        let err = LoggerError::config("Sink", "Invalid path");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_level("verbose");
        assert_eq!(err.to_string(), "Invalid log level: 'verbose'");

        let err = LoggerError::config("LoggerConfig", "unknown output");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LoggerConfig: unknown output"
        );

        assert_eq!(
            LoggerError::AlreadyInitialized.to_string(),
            "Global logger already initialized"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open /var/log/x", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
