//! # JSON Logger
//!
//! A fast, low-allocation structured logger that writes one JSON object per
//! line.
//!
//! ## Features
//!
//! - **Level masks**: enable any combination of `info`, `debug`, `warn`,
//!   `error` and `fatal`
//! - **Contextual fields**: static context via [`Logger::with`], per-call
//!   enrichment via [`Logger::hook`], optional nesting under a context name
//! - **Pooled encoders**: buffers are reused across log calls; a disabled
//!   level does no work at all
//! - **Thread safe**: loggers are immutable and cheap to clone and share
//!
//! ## Quick start
//!
//! ```
//! use json_logger::prelude::*;
//!
//! let out = MemoryWriter::new();
//! let logger = Logger::new(Some(Sink::new(out.clone())), LogLevel::Info | LogLevel::Error)
//!     .with(|e| {
//!         e.string("service", "api");
//!     });
//!
//! logger.info_with_fields("request", |e| {
//!     e.string("path", "/users").int("status", 200);
//! });
//! logger.error_with("request failed").int("status", 503).write();
//!
//! assert_eq!(
//!     out.lines()[0],
//!     r#"{"level":"info","message":"request","service":"api","path":"/users","status":200}"#
//! );
//! ```

pub mod core;
#[cfg(feature = "global")]
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ChainEntry, Encoder, Entry, FieldValue, JsonArray, JsonObject, LevelMask, LevelRegistry,
        LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result,
    };
    pub use crate::sinks::{MemoryWriter, Sink};
}

pub use crate::core::{
    set_level_key, set_level_text, set_message_key, ChainEntry, ContextFn, Encoder, EncoderPool,
    Entry, ExitFn, FieldValue, HookFn, JsonArray, JsonObject, LevelMask, LevelRegistry, LogLevel,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, PooledEncoder, Result, SinkMetrics,
    FATAL_EXIT_CODE,
};
pub use crate::sinks::{MemoryWriter, Sink};
