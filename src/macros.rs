//! Logging macros for ergonomic log message formatting.
//!
//! These macros format the message like `format!` and log it without fields.
//! The level is checked before formatting, so a disabled level costs no
//! allocation.
//!
//! # Examples
//!
//! ```
//! use json_logger::prelude::*;
//! use json_logger::info;
//!
//! let logger = Logger::new(None, LevelMask::ALL);
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at the given level.
///
/// # Examples
///
/// ```
/// # use json_logger::prelude::*;
/// # let logger = Logger::new(None, LevelMask::ALL);
/// use json_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, &format!($($arg)+));
        }
    }};
}

/// Log a debug-level message.
///
/// ```
/// # use json_logger::prelude::*;
/// # let logger = Logger::new(None, LevelMask::ALL);
/// use json_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use json_logger::prelude::*;
/// # let logger = Logger::new(None, LevelMask::ALL);
/// use json_logger::warn;
/// warn!(logger, "Memory usage at {}%", 85);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then call the logger's exit function.
///
/// ```
/// # use json_logger::prelude::*;
/// # let logger = Logger::new(None, LevelMask::ALL).with_exit_fn(|_| {});
/// use json_logger::fatal;
/// fatal!(logger, "Unrecoverable state: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_macros_format_message() {
        let out = MemoryWriter::new();
        let logger = Logger::builder()
            .writer(out.clone())
            .levels(LogLevel::Info | LogLevel::Error)
            .registry(Arc::new(LevelRegistry::new()))
            .build();

        crate::info!(logger, "port {}", 8080);
        crate::debug!(logger, "hidden {}", 1);
        crate::error!(logger, "code {code}", code = 500);

        assert_eq!(
            out.lines(),
            vec![
                "{\"level\":\"info\",\"message\":\"port 8080\"}",
                "{\"level\":\"error\",\"message\":\"code 500\"}",
            ]
        );
    }
}
