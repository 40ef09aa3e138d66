//! Log entry builders
//!
//! [`Entry`] is what fields callbacks, hooks and static context functions
//! receive: a view over the encoder of the line being built. [`ChainEntry`]
//! is the fluent variant returned by the `*_with` logger methods; it owns the
//! borrowed encoder until [`ChainEntry::write`] is called.

use super::encoder::{Encoder, JsonArray, JsonObject};
use super::field_value::FieldValue;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::pool::PooledEncoder;
use serde::Serialize;
use std::fmt;

/// Field appender over the entry currently being encoded.
///
/// Every method appends one `"key":value` member, in call order.
pub struct Entry<'a> {
    enc: &'a mut Encoder,
}

impl<'a> Entry<'a> {
    pub fn new(enc: &'a mut Encoder) -> Self {
        Self { enc }
    }

    pub fn string(&mut self, key: &str, value: &str) -> &mut Self {
        self.enc.add_string_key(key, value);
        self
    }

    pub fn int(&mut self, key: &str, value: i64) -> &mut Self {
        self.enc.add_int_key(key, value);
        self
    }

    /// Same as [`Entry::int`].
    pub fn int64(&mut self, key: &str, value: i64) -> &mut Self {
        self.int(key, value)
    }

    pub fn uint(&mut self, key: &str, value: u64) -> &mut Self {
        self.enc.add_uint_key(key, value);
        self
    }

    pub fn float(&mut self, key: &str, value: f64) -> &mut Self {
        self.enc.add_float_key(key, value);
        self
    }

    pub fn bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.enc.add_bool_key(key, value);
        self
    }

    pub fn null(&mut self, key: &str) -> &mut Self {
        self.enc.add_null_key(key);
        self
    }

    /// Append the error's message. `None` leaves the entry untouched.
    pub fn err<E: fmt::Display>(&mut self, key: &str, err: Option<E>) -> &mut Self {
        if let Some(err) = err {
            self.enc.add_display_key(key, &err);
        }
        self
    }

    /// Append `value`'s `Display` output as a string.
    pub fn display(&mut self, key: &str, value: &dyn fmt::Display) -> &mut Self {
        self.enc.add_display_key(key, value);
        self
    }

    /// Append a nested object whose members are added by `f`.
    pub fn object_fn<F>(&mut self, key: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Entry<'_>),
    {
        self.enc.add_object_fn_key(key, |enc| f(&mut Entry::new(enc)));
        self
    }

    pub fn object(&mut self, key: &str, obj: &dyn JsonObject) -> &mut Self {
        self.enc.add_object_key(key, obj);
        self
    }

    pub fn array(&mut self, key: &str, arr: &dyn JsonArray) -> &mut Self {
        self.enc.add_array_key(key, arr);
        self
    }

    pub fn any(&mut self, key: &str, value: impl Into<FieldValue>) -> &mut Self {
        self.enc.append_key(key);
        value.into().encode(self.enc);
        self
    }

    /// Append any `Serialize` value; if serialization fails the value is `null`.
    pub fn serialize<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> &mut Self {
        self.enc.add_serialize_key(key, value);
        self
    }

    /// Direct access to the underlying encoder.
    pub fn encoder(&mut self) -> &mut Encoder {
        &mut *self.enc
    }
}

/// Fluent entry returned by [`Logger::info_with`] and friends.
///
/// Whether the level is enabled is decided once, when the entry is created.
/// On a disabled entry every method is a no-op and nothing is borrowed.
/// Dropping an entry without calling [`write`](ChainEntry::write) discards it.
#[must_use = "a ChainEntry writes nothing until `write` is called"]
pub struct ChainEntry<'l> {
    logger: &'l Logger,
    level: LogLevel,
    message: &'l str,
    disabled: bool,
    enc: Option<PooledEncoder<'l>>,
}

impl<'l> ChainEntry<'l> {
    pub(crate) fn disabled(logger: &'l Logger, level: LogLevel, message: &'l str) -> Self {
        Self {
            logger,
            level,
            message,
            disabled: true,
            enc: None,
        }
    }

    pub(crate) fn enabled(
        logger: &'l Logger,
        level: LogLevel,
        message: &'l str,
        enc: PooledEncoder<'l>,
    ) -> Self {
        Self {
            logger,
            level,
            message,
            disabled: false,
            enc: Some(enc),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        self.message
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[inline]
    fn apply<F: FnOnce(&mut Entry<'_>)>(mut self, f: F) -> Self {
        if let Some(enc) = self.enc.as_mut() {
            f(&mut Entry::new(enc));
        }
        self
    }

    pub fn string(self, key: &str, value: &str) -> Self {
        self.apply(|e| {
            e.string(key, value);
        })
    }

    pub fn int(self, key: &str, value: i64) -> Self {
        self.apply(|e| {
            e.int(key, value);
        })
    }

    /// Same as [`ChainEntry::int`].
    pub fn int64(self, key: &str, value: i64) -> Self {
        self.int(key, value)
    }

    pub fn uint(self, key: &str, value: u64) -> Self {
        self.apply(|e| {
            e.uint(key, value);
        })
    }

    pub fn float(self, key: &str, value: f64) -> Self {
        self.apply(|e| {
            e.float(key, value);
        })
    }

    pub fn bool(self, key: &str, value: bool) -> Self {
        self.apply(|e| {
            e.bool(key, value);
        })
    }

    pub fn null(self, key: &str) -> Self {
        self.apply(|e| {
            e.null(key);
        })
    }

    /// Append the error's message. `None` leaves the entry untouched.
    pub fn err<E: fmt::Display>(self, key: &str, err: Option<E>) -> Self {
        self.apply(|e| {
            e.err(key, err);
        })
    }

    pub fn display(self, key: &str, value: &dyn fmt::Display) -> Self {
        self.apply(|e| {
            e.display(key, value);
        })
    }

    /// Append a nested object; `f` only runs if the entry is enabled.
    pub fn object_fn<F>(self, key: &str, f: F) -> Self
    where
        F: FnOnce(&mut Entry<'_>),
    {
        self.apply(|e| {
            e.object_fn(key, f);
        })
    }

    pub fn object(self, key: &str, obj: &dyn JsonObject) -> Self {
        self.apply(|e| {
            e.object(key, obj);
        })
    }

    pub fn array(self, key: &str, arr: &dyn JsonArray) -> Self {
        self.apply(|e| {
            e.array(key, arr);
        })
    }

    pub fn any(self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.apply(|e| {
            e.any(key, value);
        })
    }

    pub fn serialize<T: Serialize + ?Sized>(self, key: &str, value: &T) -> Self {
        self.apply(|e| {
            e.serialize(key, value);
        })
    }

    /// Close the entry, write it to the sink and release the encoder.
    ///
    /// A fatal entry then calls the logger's exit function.
    pub fn write(mut self) {
        let Some(enc) = self.enc.take() else {
            return;
        };
        self.logger.close_entry(self.level, self.message, enc);
        if self.level == LogLevel::Fatal {
            self.logger.exit(super::logger::FATAL_EXIT_CODE);
        }
    }
}

impl fmt::Debug for ChainEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEntry")
            .field("level", &self.level)
            .field("message", &self.message)
            .field("disabled", &self.disabled)
            .finish()
    }
}
