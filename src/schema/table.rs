//! Table and column descriptions.

use crate::schema::error::{SchemaError, SchemaResult};
use crate::value::{BindType, Value};
use serde::{Deserialize, Serialize};

/// Abstract column type; shares its vocabulary with bind types
pub type ColumnType = BindType;

fn default_true() -> bool {
    true
}

/// Abstract description of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub length: Option<u32>,
    /// Digits after the decimal point for decimal / float columns
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default = "default_true")]
    pub null: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub autoincrement: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnSchema {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            length: None,
            precision: None,
            null: true,
            default: None,
            autoincrement: false,
            comment: None,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.null = false;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Primary,
    Unique,
    Foreign,
}

/// Target of a foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignReference {
    pub table: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
    #[serde(default)]
    pub references: Option<ForeignReference>,
}

impl Constraint {
    pub fn primary(columns: Vec<String>) -> Self {
        Self {
            name: "primary".to_string(),
            kind: ConstraintKind::Primary,
            columns,
            references: None,
        }
    }
}

/// A table: ordered columns plus constraints
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<(String, ColumnSchema)>,
    pub constraints: Vec<Constraint>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_column(mut self, name: impl Into<String>, column: ColumnSchema) -> Self {
        self.columns.push((name.into(), column));
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Columns of the primary key constraint, if any
    pub fn primary_key(&self) -> Vec<&str> {
        self.constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::Primary)
            .map(|c| c.columns.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// True when `column` is the table's only primary key column and is an
    /// integer, which engines turn into an auto-incrementing identity
    pub fn is_identity_column(&self, column: &str) -> bool {
        let primary = self.primary_key();
        primary == [column]
            && matches!(
                self.column(column).map(|c| c.column_type),
                Some(ColumnType::Integer | ColumnType::BigInteger)
            )
    }

    /// Check that the table has columns and every constraint names
    /// existing columns
    pub fn validate(&self) -> SchemaResult<()> {
        if self.columns.is_empty() {
            return Err(SchemaError::NoColumns {
                table: self.name.clone(),
            });
        }
        for constraint in &self.constraints {
            if constraint.columns.is_empty() {
                return Err(SchemaError::EmptyConstraint {
                    table: self.name.clone(),
                    constraint: constraint.name.clone(),
                });
            }
            if let Some(missing) = constraint
                .columns
                .iter()
                .find(|c| self.column(c).is_none())
            {
                return Err(SchemaError::UnknownConstraintColumn {
                    table: self.name.clone(),
                    constraint: constraint.name.clone(),
                    column: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A column as reported by the engine's catalog
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReflectedColumn {
    pub name: String,
    pub type_name: String,
    /// Character length; -1 for MAX types
    pub char_length: Option<i64>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub null: bool,
    pub default: Option<String>,
    pub autoincrement: bool,
}
