//! Main logger implementation
//!
//! A [`Logger`] turns a level, a message and a set of fields into one line of
//! JSON on its sink:
//!
//! ```text
//! {"level":"info","message":"start","env":"prod","time":1700000000,"id":1}
//!  └─ cached prefix + message ──────┘└ static ctx ┘└── hook ─────┘└ caller ┘
//! ```
//!
//! With a context name set, static context and caller fields move into a
//! nested object while hook fields stay at the root:
//!
//! ```text
//! {"level":"info","message":"start","time":1700000000,"params":{"env":"prod","id":1}}
//! ```
//!
//! Loggers are never mutated after construction. `with`, `with_context`,
//! `hook` and friends return a new logger, so in-flight log calls on the
//! parent keep seeing the state they started with.

use super::encoder::Encoder;
use super::entry::{ChainEntry, Entry};
use super::error::Result;
use super::log_level::{LevelMask, LogLevel};
use super::pool::PooledEncoder;
use super::registry::LevelRegistry;
use crate::sinks::Sink;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Status passed to the exit function after a fatal entry is written.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Enrichment function run once per log call; its fields stay at the root.
pub type HookFn = Arc<dyn Fn(&mut Entry<'_>) + Send + Sync>;

/// Static context function added through [`Logger::with`].
pub type ContextFn = Arc<dyn Fn(&mut Entry<'_>) + Send + Sync>;

/// Called with [`FATAL_EXIT_CODE`] after a fatal entry has been written.
pub type ExitFn = Arc<dyn Fn(i32) + Send + Sync>;

fn process_exit(code: i32) {
    std::process::exit(code)
}

const LINE_CLOSE: &[u8] = b"}\n";

#[derive(Clone)]
pub struct Logger {
    sink: Sink,
    levels: LevelMask,
    hook: Option<HookFn>,
    context: Vec<ContextFn>,
    context_name: Option<Arc<str>>,
    exit_fn: ExitFn,
    registry: Arc<LevelRegistry>,
}

macro_rules! level_methods {
    ($level:expr, $name:literal, $plain:ident, $fields:ident, $chain:ident) => {
        #[doc = concat!("Log `msg` at ", $name, " level.")]
        #[inline]
        pub fn $plain(&self, msg: &str) {
            self.log($level, msg);
        }

        #[doc = concat!("Log `msg` at ", $name, " level with the fields added by `fields`.")]
        ///
        /// `fields` is not called when the level is disabled.
        #[inline]
        pub fn $fields<F>(&self, msg: &str, fields: F)
        where
            F: FnOnce(&mut Entry<'_>),
        {
            self.log_with_fields($level, msg, fields);
        }

        #[doc = concat!("Start a chainable ", $name, " entry; finish it with `write()`.")]
        #[inline]
        pub fn $chain<'a>(&'a self, msg: &'a str) -> ChainEntry<'a> {
            self.log_with($level, msg)
        }
    };
}

impl Logger {
    /// Create a logger writing to `sink`, or discarding output when `None`.
    ///
    /// ```
    /// use json_logger::{Logger, LogLevel, MemoryWriter, Sink};
    ///
    /// let out = MemoryWriter::new();
    /// let logger = Logger::new(Some(Sink::new(out.clone())), LogLevel::Info | LogLevel::Warn);
    /// logger.info("hello");
    /// logger.debug("hello");
    /// assert_eq!(out.contents(), "{\"level\":\"info\",\"message\":\"hello\"}\n");
    /// ```
    #[must_use]
    pub fn new(sink: Option<Sink>, levels: impl Into<LevelMask>) -> Self {
        Self {
            sink: sink.unwrap_or_else(Sink::discard),
            levels: levels.into(),
            hook: None,
            context: Vec::new(),
            context_name: None,
            exit_fn: Arc::new(process_exit),
            registry: Arc::clone(LevelRegistry::global()),
        }
    }

    /// Create a logger that nests context and caller fields under `context_name`.
    #[must_use]
    pub fn new_context(
        sink: Option<Sink>,
        levels: impl Into<LevelMask>,
        context_name: impl Into<String>,
    ) -> Self {
        let mut logger = Self::new(sink, levels);
        logger.context_name = non_empty(context_name.into());
        logger
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use json_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .writer(std::io::stdout())
    ///     .levels(LogLevel::Info | LogLevel::Error)
    ///     .context_name("params")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Derive a logger that also runs `f` on every entry, after the context
    /// functions already registered.
    #[must_use]
    pub fn with<F>(&self, f: F) -> Logger
    where
        F: Fn(&mut Entry<'_>) + Send + Sync + 'static,
    {
        let mut derived = self.clone();
        derived.context.push(Arc::new(f));
        derived
    }

    /// Derive a logger nesting fields under `context_name`; `""` means flat.
    #[must_use]
    pub fn with_context(&self, context_name: impl Into<String>) -> Logger {
        let mut derived = self.clone();
        derived.context_name = non_empty(context_name.into());
        derived
    }

    /// Derive a logger whose hook is `f`, replacing any previous hook.
    #[must_use]
    pub fn hook<F>(&self, f: F) -> Logger
    where
        F: Fn(&mut Entry<'_>) + Send + Sync + 'static,
    {
        let mut derived = self.clone();
        derived.hook = Some(Arc::new(f));
        derived
    }

    /// Derive a logger calling `f` instead of terminating the process after
    /// a fatal entry.
    #[must_use]
    pub fn with_exit_fn<F>(&self, f: F) -> Logger
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        let mut derived = self.clone();
        derived.exit_fn = Arc::new(f);
        derived
    }

    /// Derive a logger with a different set of enabled levels.
    #[must_use]
    pub fn with_levels(&self, levels: impl Into<LevelMask>) -> Logger {
        let mut derived = self.clone();
        derived.levels = levels.into();
        derived
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.levels.contains(level)
    }

    pub fn levels(&self) -> LevelMask {
        self.levels
    }

    pub fn context_name(&self) -> Option<&str> {
        self.context_name.as_deref()
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn registry(&self) -> &Arc<LevelRegistry> {
        &self.registry
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    /// `"file:line"` of the code calling this method.
    #[track_caller]
    pub fn caller(&self) -> String {
        let location = std::panic::Location::caller();
        format!("{}:{}", location.file(), location.line())
    }

    #[inline]
    pub fn log(&self, level: LogLevel, msg: &str) {
        self.log_with_fields(level, msg, |_| {});
    }

    pub fn log_with_fields<F>(&self, level: LogLevel, msg: &str, fields: F)
    where
        F: FnOnce(&mut Entry<'_>),
    {
        if !self.is_enabled(level) {
            return;
        }

        let mut enc = self.sink.acquire();
        self.open_entry(level, msg, &mut enc);
        fields(&mut Entry::new(&mut enc));
        self.close_entry(level, msg, enc);

        if level == LogLevel::Fatal {
            self.exit(FATAL_EXIT_CODE);
        }
    }

    pub fn log_with<'a>(&'a self, level: LogLevel, msg: &'a str) -> ChainEntry<'a> {
        if !self.is_enabled(level) {
            return ChainEntry::disabled(self, level, msg);
        }

        let mut enc = self.sink.acquire();
        self.open_entry(level, msg, &mut enc);
        ChainEntry::enabled(self, level, msg, enc)
    }

    level_methods!(LogLevel::Info, "info", info, info_with_fields, info_with);
    level_methods!(LogLevel::Debug, "debug", debug, debug_with_fields, debug_with);
    level_methods!(LogLevel::Warn, "warn", warn, warn_with_fields, warn_with);
    level_methods!(LogLevel::Error, "error", error, error_with_fields, error_with);
    level_methods!(LogLevel::Fatal, "fatal", fatal, fatal_with_fields, fatal_with);

    /// Start an entry. Flat: prefix, message, static context, hook.
    /// Nested: `{` and static context, the rest comes in `close_entry`.
    fn open_entry(&self, level: LogLevel, msg: &str, enc: &mut Encoder) {
        if self.context_name.is_none() {
            self.registry.write_prefix(level, enc);
            enc.append_string(msg);
            self.run_context(enc);
            self.run_hook(enc);
        } else {
            enc.append_byte(b'{');
            self.run_context(enc);
        }
    }

    /// Finish the entry, write it and release every encoder it used.
    pub(crate) fn close_entry(&self, level: LogLevel, msg: &str, mut enc: PooledEncoder<'_>) {
        match self.context_name.as_deref() {
            None => {
                enc.append_bytes(LINE_CLOSE);
                self.sink.write_line(enc.buf());
            }
            Some(name) => {
                enc.append_byte(b'}');

                let mut line = self.sink.acquire();
                self.registry.write_prefix(level, &mut line);
                line.append_string(msg);
                self.run_hook(&mut line);
                line.add_embedded_json_key(name, enc.buf());
                line.append_bytes(LINE_CLOSE);
                self.sink.write_line(line.buf());
            }
        }
    }

    fn run_context(&self, enc: &mut Encoder) {
        if self.context.is_empty() {
            return;
        }
        let mut entry = Entry::new(enc);
        for f in &self.context {
            f(&mut entry);
        }
    }

    fn run_hook(&self, enc: &mut Encoder) {
        if let Some(hook) = &self.hook {
            hook(&mut Entry::new(enc));
        }
    }

    pub(crate) fn exit(&self, code: i32) {
        (self.exit_fn)(code);
    }
}

fn non_empty(name: String) -> Option<Arc<str>> {
    if name.is_empty() {
        None
    } else {
        Some(Arc::from(name))
    }
}

impl Default for Logger {
    /// Logger on stdout with every level enabled.
    fn default() -> Self {
        Self::new(Some(Sink::stdout()), LevelMask::ALL)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("sink", &self.sink)
            .field("levels", &self.levels)
            .field("hook", &self.hook.is_some())
            .field("context", &self.context.len())
            .field("context_name", &self.context_name)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use json_logger::prelude::*;
///
/// let out = MemoryWriter::new();
/// let logger = Logger::builder()
///     .writer(out.clone())
///     .levels(LevelMask::ALL)
///     .with(|e| {
///         e.string("env", "prod");
///     })
///     .hook(|e| {
///         e.int("pid", 42);
///     })
///     .build();
///
/// logger.info_with_fields("start", |e| {
///     e.int("id", 1);
/// });
/// assert_eq!(
///     out.contents(),
///     "{\"level\":\"info\",\"message\":\"start\",\"env\":\"prod\",\"pid\":42,\"id\":1}\n"
/// );
/// ```
pub struct LoggerBuilder {
    sink: Option<Sink>,
    levels: LevelMask,
    hook: Option<HookFn>,
    context: Vec<ContextFn>,
    context_name: Option<String>,
    exit_fn: Option<ExitFn>,
    registry: Option<Arc<LevelRegistry>>,
}

impl LoggerBuilder {
    /// Create a new builder: all levels enabled, output discarded
    pub fn new() -> Self {
        Self {
            sink: None,
            levels: LevelMask::ALL,
            hook: None,
            context: Vec::new(),
            context_name: None,
            exit_fn: None,
            registry: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Write to `writer` through a new sink
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.sink = Some(Sink::new(writer));
        self
    }

    /// Replace the enabled levels
    #[must_use = "builder methods return a new value"]
    pub fn levels(mut self, levels: impl Into<LevelMask>) -> Self {
        self.levels = levels.into();
        self
    }

    /// Enable one more level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.levels |= level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn context_name(mut self, name: impl Into<String>) -> Self {
        self.context_name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Entry<'_>) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(f));
        self
    }

    /// Add a static context function
    #[must_use = "builder methods return a new value"]
    pub fn with<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Entry<'_>) + Send + Sync + 'static,
    {
        self.context.push(Arc::new(f));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit_fn = Some(Arc::new(f));
        self
    }

    /// Use `registry` instead of the global level registry
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<LevelRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut logger = Logger::new(self.sink, self.levels);
        logger.hook = self.hook;
        logger.context = self.context;
        logger.context_name = self.context_name.and_then(non_empty);
        if let Some(exit_fn) = self.exit_fn {
            logger.exit_fn = exit_fn;
        }
        if let Some(registry) = self.registry {
            logger.registry = registry;
        }
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
