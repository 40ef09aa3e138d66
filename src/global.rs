//! Process-wide default logger
//!
//! [`logger`] returns a stdout logger with every level enabled and a hook
//! adding `"time"` as unix seconds. Install a different one with [`init`]
//! before the first log call.
//!
//! ```no_run
//! use json_logger::global;
//!
//! global::info("service started");
//! global::error_with_fields("request failed", |e| {
//!     e.int("status", 503);
//! });
//! ```

use crate::core::{Entry, LevelMask, Logger, LoggerError, Result};
use crate::sinks::Sink;
use std::sync::OnceLock;

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Key of the timestamp field added by the default logger.
pub const TIME_KEY: &str = "time";

fn default_logger() -> Logger {
    Logger::new(Some(Sink::stdout()), LevelMask::ALL).hook(time_hook)
}

/// Add the current unix time in seconds under [`TIME_KEY`].
pub fn time_hook(e: &mut Entry<'_>) {
    e.int(TIME_KEY, chrono::Utc::now().timestamp());
}

/// The global logger, created on first use.
pub fn logger() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(default_logger)
}

/// Install `logger` as the global logger.
///
/// Fails once the global logger exists, including when a previous log call
/// created the default one.
pub fn init(logger: Logger) -> Result<()> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

macro_rules! forward {
    ($name:literal, $plain:ident, $fields:ident) => {
        #[doc = concat!("Log `msg` at ", $name, " level on the global logger.")]
        pub fn $plain(msg: &str) {
            logger().$plain(msg);
        }

        #[doc = concat!("Log `msg` at ", $name, " level with fields on the global logger.")]
        pub fn $fields<F>(msg: &str, fields: F)
        where
            F: FnOnce(&mut Entry<'_>),
        {
            logger().$fields(msg, fields);
        }
    };
}

forward!("info", info, info_with_fields);
forward!("debug", debug, debug_with_fields);
forward!("warn", warn, warn_with_fields);
forward!("error", error, error_with_fields);
forward!("fatal", fatal, fatal_with_fields);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LevelRegistry, LogLevel};
    use crate::sinks::MemoryWriter;
    use std::sync::Arc;

    #[test]
    fn test_time_hook() {
        let out = MemoryWriter::new();
        let logger = Logger::builder()
            .writer(out.clone())
            .registry(Arc::new(LevelRegistry::new()))
            .hook(time_hook)
            .build();
        let before = chrono::Utc::now().timestamp();
        logger.info("tick");
        let after = chrono::Utc::now().timestamp();

        let line: serde_json::Value = serde_json::from_str(&out.contents()).unwrap();
        let time = line[TIME_KEY].as_i64().unwrap();
        assert!(before <= time && time <= after);
        assert_eq!(line["message"], "tick");
    }

    #[test]
    fn test_init_once() {
        let logger = Logger::new(None, LogLevel::Error);
        let first = init(logger.clone());
        let second = init(logger);
        // Another test may have touched the global logger first.
        assert!(first.is_ok() || matches!(first, Err(LoggerError::AlreadyInitialized)));
        assert!(matches!(second, Err(LoggerError::AlreadyInitialized)));
        info("global logger reachable");
    }
}
