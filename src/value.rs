//! Bound values and bind types shared by expressions, fixtures and forms.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Type tag attached to a bound value, used by drivers when binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindType {
    Boolean,
    Integer,
    BigInteger,
    Float,
    Decimal,
    String,
    Text,
    Date,
    Time,
    Datetime,
    Timestamp,
    Uuid,
    Binary,
}

impl BindType {
    /// Name used in type maps and schema descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            BindType::Boolean => "boolean",
            BindType::Integer => "integer",
            BindType::BigInteger => "biginteger",
            BindType::Float => "float",
            BindType::Decimal => "decimal",
            BindType::String => "string",
            BindType::Text => "text",
            BindType::Date => "date",
            BindType::Time => "time",
            BindType::Datetime => "datetime",
            BindType::Timestamp => "timestamp",
            BindType::Uuid => "uuid",
            BindType::Binary => "binary",
        }
    }
}

/// Mapping from field name to the bind type used for its values
pub type TypeMap = HashMap<String, BindType>;

/// Values that can be bound into a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Get the natural bind type of this value
    pub fn bind_type(&self) -> Option<BindType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(BindType::Boolean),
            Value::Integer(_) => Some(BindType::Integer),
            Value::Float(_) => Some(BindType::Float),
            Value::String(_) => Some(BindType::String),
        }
    }

    /// Check if this value can be bound with the given type
    pub fn is_compatible_with(&self, bind_type: BindType) -> bool {
        match (self, bind_type) {
            (Value::Null, _) => true,
            (Value::Boolean(_), BindType::Boolean) => true,
            (Value::Integer(_), BindType::Boolean) => true,
            (Value::Integer(_), BindType::Integer | BindType::BigInteger) => true,
            (Value::Integer(_) | Value::Float(_), BindType::Float | BindType::Decimal) => true,
            // Strings carry dates, uuids and anything else the driver converts
            (Value::String(_), _) => true,
            _ => false,
        }
    }

    /// Render the value as an inline SQL literal
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{}", if *b { 1 } else { 0 }),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
