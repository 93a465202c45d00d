//! Record types flowing through the pipeline.
//!
//! - [`Line`] -- a raw input line and where it came from.
//! - [`Key`] / [`Value`] -- what mappers emit. Both have a null-marker variant
//!   for exercises where only presence matters.
//! - [`KeyValue`] -- one emission.
//! - [`OutputRecord`] -- one reducer result, written by a sink.

use std::fmt::{Display, Formatter, Result as FormatResult};

/// One line of input text.
///
/// `source` is the index of the input in the record source and `offset` the
/// byte offset of the line start within that (decoded) input. Together they
/// identify the line uniquely and order lines the way they were read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub source: usize,
    pub offset: u64,
    pub text: String,
}

impl Line {
    pub fn new(source: usize, offset: u64, text: impl Into<String>) -> Self {
        Self {
            source,
            offset,
            text: text.into(),
        }
    }

    /// Stable position of this line across all inputs.
    #[inline]
    pub fn origin(&self) -> (usize, u64) {
        (self.source, self.offset)
    }
}

/// An emitted key.
///
/// `Null` orders before every text key, so a single-aggregate group always
/// comes first. Text keys order lexicographically by bytes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Null,
    Text(String),
}

impl Key {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            Self::Null => f.write_str("(null)"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// An emitted or reduced value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A single mapper emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Key,
    pub value: Value,
}

impl KeyValue {
    pub fn new(key: impl Into<Key>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A reducer result as handed to a sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRecord {
    pub key: Key,
    pub value: Value,
}

impl OutputRecord {
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }

    /// Render the record the way the text sink writes it.
    ///
    /// `key<TAB>value` when both are present, the non-null side alone
    /// otherwise, and `None` when both are null.
    pub fn render(&self) -> Option<String> {
        let value = match &self.value {
            Value::Null => None,
            Value::Int(n) => Some(n.to_string()),
            Value::Text(s) => Some(s.clone()),
        };
        match (&self.key, value) {
            (Key::Null, None) => None,
            (Key::Null, Some(v)) => Some(v),
            (Key::Text(k), None) => Some(k.clone()),
            (Key::Text(k), Some(v)) => Some(format!("{k}\t{v}")),
        }
    }
}
