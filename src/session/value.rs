//! Dynamically typed session attribute values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{FALSE_LITERALS, TRUE_LITERALS};

/// Attribute value stored in a session
///
/// Typed accessors read the matching variant directly and otherwise fall back
/// to parsing the textual form (see [`Value::coerce_int`], [`Value::coerce_bool`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    /// Arbitrary structured value
    Opaque(serde_json::Value),
}

impl Value {
    /// Render the value as its textual form
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Integer view: direct for `Int`, otherwise a base-10 parse of the text
    pub fn coerce_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            other => other.to_text().parse::<i64>().ok(),
        }
    }

    /// Boolean view: direct for `Bool`, otherwise one of the recognized literals
    pub fn coerce_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self {
            return Some(*b);
        }

        let text = self.to_text().to_lowercase();
        if TRUE_LITERALS.contains(&text.as_str()) {
            Some(true)
        } else if FALSE_LITERALS.contains(&text.as_str()) {
            Some(false)
        } else {
            None
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
            // JSON strings render bare, everything else as compact JSON
            Value::Opaque(serde_json::Value::String(s)) => f.write_str(s),
            Value::Opaque(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Opaque(v)
    }
}
