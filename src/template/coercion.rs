//! Conversion of captured text into typed values

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A typed value extracted from one placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i32),
    Long(i64),
    Double(f64),
    Text(String),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer value widened to 64 bits; accepts both `int` and `long` fields
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Declared type of a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Long,
    Double,
    Text,
    /// A type token outside the supported set, kept verbatim for reporting
    Unsupported(String),
}

impl FieldKind {
    /// Resolve a type token (without `?`), ignoring case
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "int" => FieldKind::Int,
            "long" => FieldKind::Long,
            "double" => FieldKind::Double,
            "string" => FieldKind::Text,
            _ => FieldKind::Unsupported(token.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldKind::Int => "int",
            FieldKind::Long => "long",
            FieldKind::Double => "double",
            FieldKind::Text => "string",
            FieldKind::Unsupported(token) => token,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised while coercing a single value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("unsupported type: {0}")]
    Unsupported(String),

    #[error("cannot convert '{value}' to {kind}: {reason}")]
    Invalid {
        kind: FieldKind,
        value: String,
        reason: String,
    },
}

/// Coerce `raw` according to a type token such as `int` or `double?`
///
/// A trailing `?` makes the conversion nullable: text that does not parse
/// yields [`Value::Null`]. An unknown type name is an error either way.
pub fn coerce(raw: &str, type_token: &str) -> Result<Value, CoerceError> {
    let (token, nullable) = match type_token.strip_suffix('?') {
        Some(stripped) => (stripped, true),
        None => (type_token, false),
    };
    coerce_kind(raw, &FieldKind::from_token(token), nullable)
}

pub(crate) fn coerce_kind(raw: &str, kind: &FieldKind, nullable: bool) -> Result<Value, CoerceError> {
    let text = raw.trim();
    let converted = match kind {
        FieldKind::Int => text.parse::<i32>().map(Value::Int).map_err(|e| e.to_string()),
        FieldKind::Long => text.parse::<i64>().map(Value::Long).map_err(|e| e.to_string()),
        FieldKind::Double => text.parse::<f64>().map(Value::Double).map_err(|e| e.to_string()),
        FieldKind::Text => Ok(Value::Text(text.to_string())),
        FieldKind::Unsupported(token) => return Err(CoerceError::Unsupported(token.clone())),
    };

    match converted {
        Ok(value) => Ok(value),
        Err(_) if nullable => Ok(Value::Null),
        Err(reason) => Err(CoerceError::Invalid {
            kind: kind.clone(),
            value: text.to_string(),
            reason,
        }),
    }
}
