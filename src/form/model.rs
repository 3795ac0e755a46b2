//! Collaborators the form engine reads: model metadata and request data.

use crate::form::field::FieldPath;
use crate::schema::{ColumnSchema, TableSchema};
use std::collections::{BTreeMap, BTreeSet};

/// Field metadata and validation state of one model
pub trait ModelContext {
    fn name(&self) -> &str;

    fn primary_key(&self) -> Option<&str>;

    fn field(&self, name: &str) -> Option<&ColumnSchema>;

    /// True when the field carries validation rules
    fn validates(&self, field: &str) -> bool;

    /// Validation failures of the last save attempt
    fn errors(&self, field: &str) -> Vec<String>;
}

/// [`ModelContext`] backed by a table schema
#[derive(Debug, Clone)]
pub struct ModelSchema {
    name: String,
    table: TableSchema,
    validated: BTreeSet<String>,
    errors: BTreeMap<String, Vec<String>>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>, table: TableSchema) -> Self {
        Self {
            name: name.into(),
            table,
            validated: BTreeSet::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn validate_field(mut self, field: impl Into<String>) -> Self {
        self.validated.insert(field.into());
        self
    }

    pub fn with_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }
}

impl ModelContext for ModelSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn primary_key(&self) -> Option<&str> {
        let key = self.table.primary_key();
        if key.len() == 1 {
            key.first().copied()
        } else {
            None
        }
    }

    fn field(&self, name: &str) -> Option<&ColumnSchema> {
        self.table.column(name)
    }

    fn validates(&self, field: &str) -> bool {
        self.validated.contains(field)
    }

    fn errors(&self, field: &str) -> Vec<String> {
        self.errors.get(field).cloned().unwrap_or_default()
    }
}

/// A posted form value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostedValue {
    Text(String),
    List(Vec<String>),
}

impl PostedValue {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            PostedValue::Text(text) => text == value,
            PostedValue::List(values) => values.iter().any(|v| v == value),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PostedValue::Text(text) => Some(text),
            PostedValue::List(_) => None,
        }
    }
}

impl From<&str> for PostedValue {
    fn from(value: &str) -> Self {
        PostedValue::Text(value.to_string())
    }
}

/// CSRF state attached to the request by the security component
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityToken {
    pub key: String,
    /// Fields unlocked for every form of the request
    pub unlocked_fields: Vec<String>,
}

/// The parts of the current request a form reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestData {
    /// Current URL, the default form action
    pub here: String,
    /// Current controller action, used for form ids
    pub action: String,
    /// Posted values keyed by dotted path (`Post.title`)
    pub data: BTreeMap<String, PostedValue>,
    pub token: Option<SecurityToken>,
}

impl RequestData {
    pub fn new(here: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            here: here.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, path: impl Into<String>, value: impl Into<PostedValue>) -> Self {
        self.data.insert(path.into(), value.into());
        self
    }

    pub fn with_token(mut self, token: SecurityToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn value(&self, path: &FieldPath) -> Option<&PostedValue> {
        self.data.get(&path.dotted())
    }
}
