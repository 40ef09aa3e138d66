//! Dynamically typed field values
//!
//! `FieldValue` backs the `any` field methods: callers who don't want to pick
//! a typed method convert their value into one of these variants and the
//! variant decides how it is encoded.

use super::encoder::Encoder;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Null,
    Array(Vec<FieldValue>),
    /// Members in insertion order.
    Object(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Build an object value from key/value pairs, keeping their order.
    pub fn object<K, V, I>(members: I) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        FieldValue::Object(
            members
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Append this value at the current position of `enc`.
    pub fn encode(&self, enc: &mut Encoder) {
        match self {
            FieldValue::String(s) => enc.append_string(s),
            FieldValue::Int(i) => enc.append_int(*i),
            FieldValue::Uint(u) => enc.append_uint(*u),
            FieldValue::Float(f) => enc.append_float(*f),
            FieldValue::Bool(b) => enc.append_bool(*b),
            FieldValue::Null => enc.append_null(),
            FieldValue::Array(items) => {
                enc.append_byte(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        enc.append_byte(b',');
                    }
                    item.encode(enc);
                }
                enc.append_byte(b']');
            }
            FieldValue::Object(members) => {
                enc.append_byte(b'{');
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        enc.append_byte(b',');
                    }
                    enc.append_string(key);
                    enc.append_byte(b':');
                    value.encode(enc);
                }
                enc.append_byte(b'}');
            }
        }
    }

    /// Convert to `serde_json::Value`.
    ///
    /// Object members with duplicate keys collapse to the last one.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Uint(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(FieldValue::to_json_value).collect())
            }
            FieldValue::Object(members) => serde_json::Value::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
            FieldValue::Array(_) | FieldValue::Object(_) => {
                let mut enc = Encoder::new();
                self.encode(&mut enc);
                f.write_str(&String::from_utf8_lossy(enc.buf()))
            }
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(i: $t) -> Self {
                FieldValue::Int(i64::from(i))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(u: $t) -> Self {
                FieldValue::Uint(u64::from(u))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for FieldValue {
    fn from(i: isize) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f64::from(f))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(v: &FieldValue) -> String {
        let mut enc = Encoder::new();
        v.encode(&mut enc);
        String::from_utf8(enc.buf().to_vec()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encoded(&"hi".into()), r#""hi""#);
        assert_eq!(encoded(&(-5i32).into()), "-5");
        assert_eq!(encoded(&7u8.into()), "7");
        assert_eq!(encoded(&2.5f64.into()), "2.5");
        assert_eq!(encoded(&true.into()), "true");
        assert_eq!(encoded(&None::<i32>.into()), "null");
    }

    #[test]
    fn test_nested() {
        let v = FieldValue::object([
            ("tags", FieldValue::from(vec!["a", "b"])),
            ("count", FieldValue::from(2)),
            ("inner", FieldValue::object([("ok", true)])),
        ]);
        assert_eq!(
            encoded(&v),
            r#"{"tags":["a","b"],"count":2,"inner":{"ok":true}}"#
        );
        assert_eq!(v.to_string(), encoded(&v));
    }

    #[test]
    fn test_to_json_value() {
        let v = FieldValue::object([("n", FieldValue::from(1)), ("f", FieldValue::from(f64::NAN))]);
        let json = v.to_json_value();
        assert_eq!(json["n"], 1);
        assert!(json["f"].is_null());
    }
}
