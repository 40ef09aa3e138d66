//! JSON byte encoder
//!
//! A thin, append-only writer over a reusable byte buffer. It knows nothing
//! about levels or loggers: callers append raw fragments, keys and values and
//! the encoder takes care of separators, escaping and number formatting.
//! Escaping and number formatting go through `serde_json`.

use serde::Serialize;
use serde::Serializer as _;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Default capacity of a freshly allocated encoder buffer.
pub const DEFAULT_ENCODER_CAPACITY: usize = 512;

/// A value that can write its own fields into an open JSON object.
///
/// The encoder has already written `{` when `encode_object` is called and
/// writes `}` after it returns; implementations only add keys.
///
/// ```
/// use json_logger::{Encoder, JsonObject};
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// impl JsonObject for User {
///     fn encode_object(&self, enc: &mut Encoder) {
///         enc.add_string_key("name", &self.name);
///         enc.add_uint_key("age", u64::from(self.age));
///     }
/// }
///
/// let mut enc = Encoder::new();
/// enc.append_bytes(b"{");
/// enc.add_object_key("user", &User { name: "ann".into(), age: 30 });
/// enc.append_bytes(b"}");
/// assert_eq!(enc.buf(), br#"{"user":{"name":"ann","age":30}}"#);
/// ```
pub trait JsonObject {
    fn encode_object(&self, enc: &mut Encoder);
}

/// A value that can write its own elements into an open JSON array.
pub trait JsonArray {
    fn encode_array(&self, enc: &mut Encoder);
}

impl<T: JsonObject + ?Sized> JsonObject for &T {
    fn encode_object(&self, enc: &mut Encoder) {
        (**self).encode_object(enc)
    }
}

impl<T: JsonObject + ?Sized> JsonObject for Box<T> {
    fn encode_object(&self, enc: &mut Encoder) {
        (**self).encode_object(enc)
    }
}

impl<T: JsonObject> JsonArray for [T] {
    fn encode_array(&self, enc: &mut Encoder) {
        for item in self {
            enc.add_object(item);
        }
    }
}

impl<T: JsonObject> JsonArray for Vec<T> {
    fn encode_array(&self, enc: &mut Encoder) {
        self.as_slice().encode_array(enc)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ENCODER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes encoded so far.
    #[inline]
    pub fn buf(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Clear the buffer, keeping its allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Append raw bytes without any separator or escaping.
    #[inline]
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn append_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Append a quoted, escaped JSON string.
    pub fn append_string(&mut self, s: &str) {
        // Writing into a Vec cannot fail.
        let _ = self.serializer().serialize_str(s);
    }

    /// Append the `Display` output of `value` as a quoted, escaped JSON string.
    ///
    /// A `Display` impl that reports an error produces `null`.
    pub fn append_display(&mut self, value: &dyn fmt::Display) {
        let mut text = String::new();
        match fmt::write(&mut text, format_args!("{}", value)) {
            Ok(()) => self.append_string(&text),
            Err(_) => self.append_null(),
        }
    }

    pub fn append_int(&mut self, v: i64) {
        let _ = self.serializer().serialize_i64(v);
    }

    pub fn append_uint(&mut self, v: u64) {
        let _ = self.serializer().serialize_u64(v);
    }

    /// Non-finite floats are written as `null`.
    pub fn append_float(&mut self, v: f64) {
        let _ = self.serializer().serialize_f64(v);
    }

    pub fn append_bool(&mut self, v: bool) {
        self.buf.extend_from_slice(if v { b"true" as &[u8] } else { b"false" });
    }

    pub fn append_null(&mut self) {
        self.buf.extend_from_slice(b"null");
    }

    /// Append any `Serialize` value; a failing serialization writes `null`.
    ///
    /// serde_json panics if a `Display` reached through `collect_str` fails;
    /// that panic is contained here and treated as a failed serialization.
    pub fn append_serialize<T: Serialize + ?Sized>(&mut self, value: &T) {
        let start = self.buf.len();
        let buf = &mut self.buf;
        let result =
            panic::catch_unwind(AssertUnwindSafe(|| serde_json::to_writer(&mut *buf, value)));
        if !matches!(result, Ok(Ok(()))) {
            self.buf.truncate(start);
            self.buf.extend_from_slice(b"null");
        }
    }

    // -- keyed values, for use inside an open object --

    pub fn add_string_key(&mut self, key: &str, v: &str) {
        self.append_key(key);
        self.append_string(v);
    }

    pub fn add_display_key(&mut self, key: &str, v: &dyn fmt::Display) {
        self.append_key(key);
        self.append_display(v);
    }

    pub fn add_int_key(&mut self, key: &str, v: i64) {
        self.append_key(key);
        self.append_int(v);
    }

    pub fn add_uint_key(&mut self, key: &str, v: u64) {
        self.append_key(key);
        self.append_uint(v);
    }

    pub fn add_float_key(&mut self, key: &str, v: f64) {
        self.append_key(key);
        self.append_float(v);
    }

    pub fn add_bool_key(&mut self, key: &str, v: bool) {
        self.append_key(key);
        self.append_bool(v);
    }

    pub fn add_null_key(&mut self, key: &str) {
        self.append_key(key);
        self.append_null();
    }

    pub fn add_object_key(&mut self, key: &str, obj: &dyn JsonObject) {
        self.append_key(key);
        self.buf.push(b'{');
        obj.encode_object(self);
        self.buf.push(b'}');
    }

    /// Write `key` followed by an object whose fields are produced by `f`.
    pub fn add_object_fn_key<F>(&mut self, key: &str, f: F)
    where
        F: FnOnce(&mut Encoder),
    {
        self.append_key(key);
        self.buf.push(b'{');
        f(self);
        self.buf.push(b'}');
    }

    pub fn add_array_key(&mut self, key: &str, arr: &dyn JsonArray) {
        self.append_key(key);
        self.buf.push(b'[');
        arr.encode_array(self);
        self.buf.push(b']');
    }

    /// Write `key` followed by already-encoded JSON, copied verbatim.
    pub fn add_embedded_json_key(&mut self, key: &str, raw: &[u8]) {
        self.append_key(key);
        self.buf.extend_from_slice(raw);
    }

    pub fn add_serialize_key<T: Serialize + ?Sized>(&mut self, key: &str, v: &T) {
        self.append_key(key);
        self.append_serialize(v);
    }

    // -- un-keyed values, for use inside an open array --

    pub fn add_string(&mut self, v: &str) {
        self.separate();
        self.append_string(v);
    }

    pub fn add_int(&mut self, v: i64) {
        self.separate();
        self.append_int(v);
    }

    pub fn add_uint(&mut self, v: u64) {
        self.separate();
        self.append_uint(v);
    }

    pub fn add_float(&mut self, v: f64) {
        self.separate();
        self.append_float(v);
    }

    pub fn add_bool(&mut self, v: bool) {
        self.separate();
        self.append_bool(v);
    }

    pub fn add_null(&mut self) {
        self.separate();
        self.append_null();
    }

    pub fn add_object(&mut self, obj: &dyn JsonObject) {
        self.separate();
        self.buf.push(b'{');
        obj.encode_object(self);
        self.buf.push(b'}');
    }

    pub fn add_array(&mut self, arr: &dyn JsonArray) {
        self.separate();
        self.buf.push(b'[');
        arr.encode_array(self);
        self.buf.push(b']');
    }

    /// Emit `,` unless this is the first member of the enclosing object or array.
    #[inline]
    fn separate(&mut self) {
        match self.buf.last() {
            None | Some(b'{') | Some(b'[') => {}
            Some(_) => self.buf.push(b','),
        }
    }

    /// Write the separator and `"key":`; the value must be appended next.
    #[inline]
    pub fn append_key(&mut self, key: &str) {
        self.separate();
        self.append_string(key);
        self.buf.push(b':');
    }

    #[inline]
    fn serializer(&mut self) -> serde_json::Serializer<&mut Vec<u8>> {
        serde_json::Serializer::new(&mut self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i64,
        y: i64,
    }

    impl JsonObject for Point {
        fn encode_object(&self, enc: &mut Encoder) {
            enc.add_int_key("x", self.x);
            enc.add_int_key("y", self.y);
        }
    }

    fn object(f: impl FnOnce(&mut Encoder)) -> String {
        let mut enc = Encoder::new();
        enc.append_byte(b'{');
        f(&mut enc);
        enc.append_byte(b'}');
        String::from_utf8(enc.buf().to_vec()).unwrap()
    }

    #[test]
    fn test_separators() {
        let out = object(|enc| {
            enc.add_string_key("a", "b");
            enc.add_int_key("n", -3);
            enc.add_bool_key("ok", false);
            enc.add_null_key("none");
        });
        assert_eq!(out, r#"{"a":"b","n":-3,"ok":false,"none":null}"#);
    }

    #[test]
    fn test_escaping() {
        let out = object(|enc| enc.add_string_key("k\"ey", "line\nbreak \"quoted\" \\"));
        assert_eq!(out, r#"{"k\"ey":"line\nbreak \"quoted\" \\"}"#);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["k\"ey"], "line\nbreak \"quoted\" \\");
    }

    #[test]
    fn test_floats() {
        let out = object(|enc| {
            enc.add_float_key("a", 1.15234);
            enc.add_float_key("b", 0.15);
            enc.add_float_key("nan", f64::NAN);
        });
        assert_eq!(out, r#"{"a":1.15234,"b":0.15,"nan":null}"#);
    }

    #[test]
    fn test_nested_object_and_array() {
        let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
        let out = object(|enc| {
            enc.add_object_key("p", &Point { x: 0, y: 0 });
            enc.add_array_key("ps", &points);
            enc.add_object_fn_key("empty", |_| {});
        });
        assert_eq!(
            out,
            r#"{"p":{"x":0,"y":0},"ps":[{"x":1,"y":2},{"x":3,"y":4}],"empty":{}}"#
        );
    }

    #[test]
    fn test_array_elements() {
        let mut enc = Encoder::new();
        enc.append_byte(b'[');
        enc.add_string("a");
        enc.add_uint(7);
        enc.add_float(2.5);
        enc.add_null();
        enc.append_byte(b']');
        assert_eq!(enc.buf(), br#"["a",7,2.5,null]"#);
    }

    #[test]
    fn test_display_and_serialize() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk \"full\"");
        let out = object(|enc| {
            enc.add_display_key("err", &err);
            enc.add_serialize_key("tags", &["x", "y"]);
        });
        assert_eq!(out, r#"{"err":"disk \"full\"","tags":["x","y"]}"#);
    }

    #[test]
    fn test_embedded_json() {
        let out = object(|enc| {
            enc.add_string_key("a", "b");
            enc.add_embedded_json_key("ctx", br#"{"x":1}"#);
        });
        assert_eq!(out, r#"{"a":"b","ctx":{"x":1}}"#);
    }

    struct Flaky;

    impl fmt::Display for Flaky {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    struct FlakySerialize;

    impl Serialize for FlakySerialize {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(&Flaky)
        }
    }

    struct Refuses;

    impl Serialize for Refuses {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not serializable"))
        }
    }

    #[test]
    fn test_failing_display_is_null() {
        let out = object(|enc| {
            enc.add_display_key("err", &Flaky);
            enc.add_int_key("after", 1);
        });
        assert_eq!(out, r#"{"err":null,"after":1}"#);
    }

    #[test]
    fn test_failing_serialize_is_null() {
        let out = object(|enc| {
            enc.add_serialize_key("collected", &FlakySerialize);
            enc.add_serialize_key("refused", &Refuses);
            enc.add_serialize_key("nested", &vec![1, 2]);
        });
        assert_eq!(out, r#"{"collected":null,"refused":null,"nested":[1,2]}"#);
    }

    #[test]
    fn test_reset_keeps_capacity() {
        let mut enc = Encoder::with_capacity(64);
        enc.append_string("some text");
        let cap = enc.capacity();
        enc.reset();
        assert!(enc.is_empty());
        assert_eq!(enc.capacity(), cap);
    }
}
