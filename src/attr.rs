//! Key/value attributes attached to a [`Record`](crate::record::Record).
//!
//! The free functions in this module are pure constructors; they have no
//! side effects and can be called whether or not a record is ever built.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Key of the attribute produced by [`err`].
pub const ERROR_KEY: &str = "error";
/// Key of the attribute produced by [`op`].
pub const OP_KEY: &str = "op";
/// Substituted for an empty attribute key.
pub const BAD_KEY: &str = "!BADKEY";

/// A caller-supplied failure, carried through the pipeline untouched.
///
/// Sinks only ever render it through `Display`.
#[derive(Clone)]
pub struct ErrorValue(Arc<dyn Error + Send + Sync + 'static>);

impl ErrorValue {
    pub fn new<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        ErrorValue(Arc::new(err))
    }

    /// For boxed errors, which the blanket `From` does not cover.
    pub fn from_boxed(err: Box<dyn Error + Send + Sync + 'static>) -> Self {
        ErrorValue(Arc::from(err))
    }
}

impl<E> From<E> for ErrorValue
where
    E: Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        ErrorValue::new(err)
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// Attribute value.
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Error(ErrorValue),
    Any(serde_json::Value),
}

impl Value {
    /// JSON form used by the structured and remote sinks.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Error(e) => serde_json::Value::String(e.to_string()),
            Value::Any(v) => v.clone(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Error(e) => serializer.collect_str(e),
            Value::Any(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Error(e) => write!(f, "{e}"),
            Value::Any(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Any(serde_json::Value::from(v)),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<ErrorValue> for Value {
    fn from(v: ErrorValue) -> Self {
        Value::Error(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Any(v)
    }
}

/// A single key/value pair. Keys are never empty.
#[derive(Debug, Clone)]
pub struct Attr {
    key: Cow<'static, str>,
    value: Value,
}

impl Attr {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let key = if key.is_empty() { Cow::Borrowed(BAD_KEY) } else { key };
        Attr { key, value: value.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// `error` attribute wrapping a caller-supplied failure.
pub fn err(err: impl Into<ErrorValue>) -> Attr {
    Attr::new(ERROR_KEY, Value::Error(err.into()))
}

/// `op` attribute naming the logical operation.
pub fn op(value: impl Into<String>) -> Attr {
    Attr::new(OP_KEY, Value::Str(value.into()))
}

pub fn str(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Attr {
    Attr::new(key, Value::Str(value.into()))
}

pub fn int(key: impl Into<Cow<'static, str>>, value: i64) -> Attr {
    Attr::new(key, Value::Int(value))
}

pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Attr {
    Attr::new(key, Value::Float(value))
}

pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Attr {
    Attr::new(key, Value::Bool(value))
}

/// Arbitrary structured value, captured through serde.
///
/// A value that fails to serialize is kept as the string `!ERROR:<reason>`.
pub fn any<T>(key: impl Into<Cow<'static, str>>, value: &T) -> Attr
where
    T: Serialize + ?Sized,
{
    let value = match serde_json::to_value(value) {
        Ok(v) => Value::Any(v),
        Err(e) => Value::Str(format!("!ERROR:{e}")),
    };
    Attr::new(key, value)
}
