//! Level registry
//!
//! Holds the display name of every level, the key under which the level is
//! written and the key under which the message is written. From those it
//! keeps one cached opening fragment per level,
//! `{"<levelKey>":"<name>","<messageKey>":`, which log calls copy verbatim
//! before appending the escaped message.
//!
//! Any rename rebuilds all five fragments while holding the write lock, so a
//! concurrent log call sees either the old fragment or the new one, never a
//! mix of both.

use super::encoder::Encoder;
use super::log_level::LogLevel;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

pub const DEFAULT_LEVEL_KEY: &str = "level";
pub const DEFAULT_MESSAGE_KEY: &str = "message";

static GLOBAL_REGISTRY: OnceLock<Arc<LevelRegistry>> = OnceLock::new();

#[derive(Debug)]
struct RegistryState {
    names: [String; 5],
    level_key: String,
    message_key: String,
    prefixes: [Vec<u8>; 5],
}

impl RegistryState {
    fn defaults() -> Self {
        let mut state = Self {
            names: LogLevel::ALL.map(|l| l.to_str().to_string()),
            level_key: DEFAULT_LEVEL_KEY.to_string(),
            message_key: DEFAULT_MESSAGE_KEY.to_string(),
            prefixes: Default::default(),
        };
        state.regenerate();
        state
    }

    fn regenerate(&mut self) {
        for level in LogLevel::ALL {
            let idx = level.index();
            let mut enc = Encoder::with_capacity(
                self.level_key.len() + self.names[idx].len() + self.message_key.len() + 12,
            );
            enc.append_byte(b'{');
            enc.append_string(&self.level_key);
            enc.append_byte(b':');
            enc.append_string(&self.names[idx]);
            enc.append_byte(b',');
            enc.append_string(&self.message_key);
            enc.append_byte(b':');
            self.prefixes[idx] = enc.into_bytes();
        }
    }
}

/// Level names and shared keys, with their cached JSON prefixes.
///
/// Loggers use [`LevelRegistry::global`] unless built with their own
/// registry, which keeps renames in one test from leaking into another.
#[derive(Debug)]
pub struct LevelRegistry {
    state: RwLock<RegistryState>,
}

impl LevelRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::defaults()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Arc<LevelRegistry> {
        GLOBAL_REGISTRY.get_or_init(|| Arc::new(LevelRegistry::new()))
    }

    /// Rename `level` in every subsequent log line.
    pub fn set_level_text(&self, level: LogLevel, text: impl Into<String>) {
        let mut state = self.state.write();
        state.names[level.index()] = text.into();
        state.regenerate();
    }

    pub fn set_message_key(&self, key: impl Into<String>) {
        let mut state = self.state.write();
        state.message_key = key.into();
        state.regenerate();
    }

    pub fn set_level_key(&self, key: impl Into<String>) {
        let mut state = self.state.write();
        state.level_key = key.into();
        state.regenerate();
    }

    /// Restore the default names and keys.
    pub fn reset(&self) {
        *self.state.write() = RegistryState::defaults();
    }

    pub fn level_text(&self, level: LogLevel) -> String {
        self.state.read().names[level.index()].clone()
    }

    pub fn message_key(&self) -> String {
        self.state.read().message_key.clone()
    }

    pub fn level_key(&self) -> String {
        self.state.read().level_key.clone()
    }

    /// Copy of the cached opening fragment for `level`.
    pub fn prefix(&self, level: LogLevel) -> Vec<u8> {
        self.state.read().prefixes[level.index()].clone()
    }

    /// Append the opening fragment for `level` to `enc`.
    #[inline]
    pub fn write_prefix(&self, level: LogLevel, enc: &mut Encoder) {
        enc.append_bytes(&self.state.read().prefixes[level.index()]);
    }
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Rename `level` in the global registry.
pub fn set_level_text(level: LogLevel, text: impl Into<String>) {
    LevelRegistry::global().set_level_text(level, text);
}

/// Change the message key in the global registry.
pub fn set_message_key(key: impl Into<String>) {
    LevelRegistry::global().set_message_key(key);
}

/// Change the level key in the global registry.
pub fn set_level_key(key: impl Into<String>) {
    LevelRegistry::global().set_level_key(key);
}
