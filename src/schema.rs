//! Schema reflection and DDL generation.
//!
//! A [`SchemaDialect`] turns a [`TableSchema`] into CREATE / DROP / TRUNCATE
//! statements for one engine, and produces the catalog queries used to
//! describe existing tables.

pub mod error;
pub mod sqlite;
pub mod sqlserver;
pub mod table;

pub use error::{SchemaError, SchemaResult};
pub use sqlite::SqliteSchema;
pub use sqlserver::SqlServerSchema;
pub use table::{
    ColumnSchema, ColumnType, Constraint, ConstraintKind, ForeignReference, ReflectedColumn,
    TableSchema,
};

use crate::dialect::IdentifierQuoter;
use crate::value::Value;
use std::fmt;

/// Engine-specific schema statements
pub trait SchemaDialect: fmt::Debug {
    fn quoter(&self) -> IdentifierQuoter;

    /// Query listing the tables of a schema, with its parameters
    fn list_tables_sql(&self, schema: Option<&str>) -> (String, Vec<Value>);

    /// Query describing the columns of one table, with its parameters
    fn describe_table_sql(&self, table: &str, schema: Option<&str>) -> (String, Vec<Value>);

    /// Convert one row of `describe_table_sql` output into a column
    fn convert_column_description(&self, row: &ReflectedColumn) -> ColumnSchema;

    /// Column definition inside CREATE TABLE
    fn column_sql(&self, table: &TableSchema, name: &str, column: &ColumnSchema) -> String;

    /// Constraint definition inside CREATE TABLE; `None` when the column
    /// definitions already carry it
    fn constraint_sql(&self, table: &TableSchema, constraint: &Constraint) -> Option<String> {
        let _ = table;
        Some(key_sql(&self.quoter(), constraint))
    }

    fn create_table_sql(&self, table: &TableSchema) -> SchemaResult<Vec<String>> {
        table.validate()?;
        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|(name, column)| self.column_sql(table, name, column))
            .collect();
        lines.extend(
            table
                .constraints
                .iter()
                .filter_map(|c| self.constraint_sql(table, c)),
        );
        Ok(vec![format!(
            "CREATE TABLE {} (\n{}\n)",
            self.quoter().quote(&table.name),
            lines.join(",\n")
        )])
    }

    fn drop_table_sql(&self, table: &TableSchema) -> Vec<String> {
        vec![format!("DROP TABLE {}", self.quoter().quote(&table.name))]
    }

    fn truncate_table_sql(&self, table: &TableSchema) -> Vec<String>;

    /// Statement toggling explicit inserts into an identity column
    fn identity_insert_sql(&self, _table: &TableSchema, _enabled: bool) -> Option<String> {
        None
    }
}

/// `CONSTRAINT [name] <kind> (cols)` plus the reference of a foreign key
pub(crate) fn key_sql(quoter: &IdentifierQuoter, constraint: &Constraint) -> String {
    let columns = quote_list(quoter, &constraint.columns);
    let kind = match constraint.kind {
        ConstraintKind::Primary => "PRIMARY KEY",
        ConstraintKind::Unique => "UNIQUE",
        ConstraintKind::Foreign => "FOREIGN KEY",
    };
    let mut out = format!(
        "CONSTRAINT {} {} ({})",
        quoter.quote(&constraint.name),
        kind,
        columns
    );
    if let (ConstraintKind::Foreign, Some(reference)) = (constraint.kind, &constraint.references) {
        out.push_str(&format!(
            " REFERENCES {} ({})",
            quoter.quote(&reference.table),
            quote_list(quoter, &reference.columns)
        ));
    }
    out
}

pub(crate) fn quote_list(quoter: &IdentifierQuoter, names: &[String]) -> String {
    names
        .iter()
        .map(|n| quoter.quote(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// ` NOT NULL` / ` DEFAULT ...` suffix shared by the engines
pub(crate) fn nullability_sql(table: &TableSchema, name: &str, column: &ColumnSchema) -> String {
    let mut out = String::new();
    if !column.null {
        out.push_str(" NOT NULL");
    }
    match &column.default {
        Some(value) if !value.is_null() => {
            out.push_str(" DEFAULT ");
            out.push_str(&value.to_sql_literal());
        }
        _ if column.null && !table.primary_key().contains(&name) => {
            out.push_str(" DEFAULT NULL");
        }
        _ => {}
    }
    out
}

/// Parse a catalog default such as `((0))`, `('abc')` or `N'abc'`
pub(crate) fn parse_default(raw: Option<&str>, column_type: ColumnType) -> Option<Value> {
    let mut text = raw?.trim();
    while text.len() >= 2 && text.starts_with('(') && text.ends_with(')') {
        text = text[1..text.len() - 1].trim();
    }
    if text.is_empty() || text.eq_ignore_ascii_case("NULL") {
        return None;
    }
    let unquoted = text.strip_prefix('N').unwrap_or(text);
    if unquoted.len() >= 2 && unquoted.starts_with('\'') && unquoted.ends_with('\'') {
        let inner = &unquoted[1..unquoted.len() - 1];
        return Some(Value::String(inner.replace("''", "'")));
    }
    let parsed = match column_type {
        ColumnType::Boolean => text.parse::<i64>().ok().map(|n| Value::Boolean(n != 0)),
        ColumnType::Integer | ColumnType::BigInteger => text.parse::<i64>().ok().map(Value::Integer),
        ColumnType::Float | ColumnType::Decimal => text.parse::<f64>().ok().map(Value::Float),
        _ => None,
    };
    Some(parsed.unwrap_or_else(|| Value::String(text.to_string())))
}
