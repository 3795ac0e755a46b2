//! Declarative test-table fixtures.
//!
//! A fixture names a table, its fields and constraints, and a set of
//! records. Rendering it through a [`SchemaDialect`] yields the DDL to
//! create, drop or truncate the table and one multi-row INSERT.
//!
//! ```toml
//! table = "prefix_prefix_tests"
//!
//! [[fields]]
//! name = "id"
//! type = "integer"
//!
//! [[constraints]]
//! name = "primary"
//! type = "primary"
//! columns = ["id"]
//! ```

use crate::expression::ValueBinder;
use crate::schema::{
    ColumnSchema, Constraint, SchemaDialect, SchemaError, SchemaResult, TableSchema,
};
use crate::value::Value;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One named field of a fixture table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub column: ColumnSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub table: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub records: Vec<BTreeMap<String, Value>>,
}

impl Fixture {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse fixture")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid fixture {}", path.display()))
    }

    /// The table described by this fixture
    pub fn schema(&self) -> TableSchema {
        let table = self
            .fields
            .iter()
            .fold(TableSchema::new(self.table.clone()), |table, field| {
                table.add_column(field.name.clone(), field.column.clone())
            });
        self.constraints
            .iter()
            .cloned()
            .fold(table, TableSchema::add_constraint)
    }

    pub fn create_sql(&self, schema: &dyn SchemaDialect) -> SchemaResult<Vec<String>> {
        schema.create_table_sql(&self.schema())
    }

    pub fn drop_sql(&self, schema: &dyn SchemaDialect) -> Vec<String> {
        schema.drop_table_sql(&self.schema())
    }

    pub fn truncate_sql(&self, schema: &dyn SchemaDialect) -> Vec<String> {
        schema.truncate_table_sql(&self.schema())
    }

    /// One multi-row INSERT covering every record, or `None` without records.
    ///
    /// Columns follow field order; a record missing a column binds NULL.
    pub fn insert_sql(
        &self,
        schema: &dyn SchemaDialect,
        binder: &mut ValueBinder,
    ) -> SchemaResult<Option<String>> {
        if self.records.is_empty() {
            return Ok(None);
        }
        let table = self.schema();
        for record in &self.records {
            if let Some(unknown) = record.keys().find(|key| table.column(key).is_none()) {
                return Err(SchemaError::UnknownField {
                    table: self.table.clone(),
                    field: unknown.clone(),
                });
            }
        }

        let columns: Vec<&FieldDef> = self
            .fields
            .iter()
            .filter(|field| self.records.iter().any(|r| r.contains_key(&field.name)))
            .collect();
        let quoter = schema.quoter();
        let names: Vec<String> = columns.iter().map(|f| quoter.quote(&f.name)).collect();

        let rows: Vec<String> = self
            .records
            .iter()
            .map(|record| {
                let placeholders: Vec<String> = columns
                    .iter()
                    .map(|field| {
                        let value = record.get(&field.name).cloned().unwrap_or(Value::Null);
                        binder.bind_value(&value, Some(field.column.column_type))
                    })
                    .collect();
                format!("({})", placeholders.join(", "))
            })
            .collect();

        debug!("Fixture {}: {} record(s)", self.table, rows.len());
        Ok(Some(format!(
            "INSERT INTO {} ({}) VALUES {}",
            quoter.quote(&self.table),
            names.join(", "),
            rows.join(", ")
        )))
    }

    /// INSERT wrapped in identity-insert toggles when records set an
    /// identity column explicitly
    pub fn insert_statements(
        &self,
        schema: &dyn SchemaDialect,
        binder: &mut ValueBinder,
    ) -> SchemaResult<Vec<String>> {
        let Some(insert) = self.insert_sql(schema, binder)? else {
            return Ok(Vec::new());
        };
        let table = self.schema();
        let is_identity = |key: &str| {
            table.is_identity_column(key) || table.column(key).map_or(false, |c| c.autoincrement)
        };
        let sets_identity = self
            .records
            .iter()
            .any(|record| record.keys().any(|key| is_identity(key)));
        let toggles = if sets_identity {
            schema
                .identity_insert_sql(&table, true)
                .zip(schema.identity_insert_sql(&table, false))
        } else {
            None
        };
        Ok(match toggles {
            Some((on, off)) => vec![on, insert, off],
            None => vec![insert],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::IdentifierQuoter;
    use crate::schema::{ColumnType, SqlServerSchema, SqliteSchema};

    const ARTICLES: &str = r#"
table = "articles"

[[fields]]
name = "id"
type = "integer"
null = false

[[fields]]
name = "title"
type = "string"
length = 50

[[fields]]
name = "published"
type = "boolean"
default = false

[[constraints]]
name = "primary"
type = "primary"
columns = ["id"]

[[records]]
id = 1
title = "First"
published = true

[[records]]
id = 2
title = "Second"
"#;

    fn sqlserver() -> SqlServerSchema {
        SqlServerSchema::new(IdentifierQuoter::new('[', ']'))
    }

    #[test]
    fn test_parse_fixture() {
        let fixture = Fixture::from_toml_str(ARTICLES).unwrap();
        assert_eq!(fixture.table, "articles");
        assert_eq!(fixture.fields.len(), 3);
        assert_eq!(fixture.fields[1].column.column_type, ColumnType::String);
        assert_eq!(fixture.fields[1].column.length, Some(50));
        assert_eq!(fixture.fields[2].column.default, Some(Value::Boolean(false)));
        assert_eq!(fixture.records.len(), 2);
        assert_eq!(fixture.schema().primary_key(), vec!["id"]);
    }

    #[test]
    fn test_insert_sql_binds_every_row() {
        let fixture = Fixture::from_toml_str(ARTICLES).unwrap();
        let mut binder = ValueBinder::new();
        let sql = fixture.insert_sql(&sqlserver(), &mut binder).unwrap().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO [articles] ([id], [title], [published]) \
             VALUES (:c0, :c1, :c2), (:c3, :c4, :c5)"
        );
        assert_eq!(binder.bindings().len(), 6);
        let missing = binder.get(":c5").unwrap();
        assert_eq!(missing.value, Value::Null);
        assert_eq!(missing.bind_type, Some(ColumnType::Boolean));
    }

    #[test]
    fn test_insert_statements_toggle_identity() {
        let fixture = Fixture::from_toml_str(ARTICLES).unwrap();
        let statements = fixture
            .insert_statements(&sqlserver(), &mut ValueBinder::new())
            .unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0], "SET IDENTITY_INSERT [articles] ON");
        assert_eq!(statements[2], "SET IDENTITY_INSERT [articles] OFF");

        let sqlite = SqliteSchema::new(IdentifierQuoter::new('"', '"'));
        let statements = fixture
            .insert_statements(&sqlite, &mut ValueBinder::new())
            .unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_unknown_record_field() {
        let mut fixture = Fixture::from_toml_str(ARTICLES).unwrap();
        fixture.records[0].insert("slug".to_string(), Value::from("first"));
        let err = fixture
            .insert_sql(&sqlserver(), &mut ValueBinder::new())
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownField {
                table: "articles".to_string(),
                field: "slug".to_string(),
            }
        );
    }

    #[test]
    fn test_no_records_means_no_insert() {
        let mut fixture = Fixture::from_toml_str(ARTICLES).unwrap();
        fixture.records.clear();
        assert_eq!(
            fixture.insert_sql(&sqlserver(), &mut ValueBinder::new()).unwrap(),
            None
        );
        assert!(fixture
            .insert_statements(&sqlserver(), &mut ValueBinder::new())
            .unwrap()
            .is_empty());
    }
}
