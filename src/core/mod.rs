//! Core logger types and traits

pub mod config;
pub mod encoder;
pub mod entry;
pub mod error;
pub mod field_value;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pool;
pub mod registry;

pub use config::LoggerConfig;
pub use encoder::{Encoder, JsonArray, JsonObject, DEFAULT_ENCODER_CAPACITY};
pub use entry::{ChainEntry, Entry};
pub use error::{LoggerError, Result};
pub use field_value::FieldValue;
pub use log_level::{LevelMask, LogLevel};
pub use logger::{ContextFn, ExitFn, HookFn, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::SinkMetrics;
pub use pool::{EncoderPool, PooledEncoder, DEFAULT_POOL_SIZE, MAX_POOLED_CAPACITY};
pub use registry::{
    set_level_key, set_level_text, set_message_key, LevelRegistry, DEFAULT_LEVEL_KEY,
    DEFAULT_MESSAGE_KEY,
};
