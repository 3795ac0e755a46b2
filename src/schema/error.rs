//! Schema layer error types.

use thiserror::Error;

/// Errors raised while describing or generating table schemas
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Table {table} has no columns")]
    NoColumns { table: String },

    #[error("Constraint {constraint} on {table} references unknown column {column}")]
    UnknownConstraintColumn {
        table: String,
        constraint: String,
        column: String,
    },

    #[error("Constraint {constraint} on {table} lists no columns")]
    EmptyConstraint { table: String, constraint: String },

    #[error("Unknown field {field} in records for table {table}")]
    UnknownField { table: String, field: String },
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
