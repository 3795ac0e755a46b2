//! SQLite schema dialect.

use crate::dialect::IdentifierQuoter;
use crate::schema::table::{
    ColumnSchema, ColumnType, Constraint, ConstraintKind, ReflectedColumn, TableSchema,
};
use crate::schema::{key_sql, nullability_sql, parse_default, SchemaDialect};
use crate::value::Value;

#[derive(Debug, Clone, Copy)]
pub struct SqliteSchema {
    quoter: IdentifierQuoter,
}

impl SqliteSchema {
    pub fn new(quoter: IdentifierQuoter) -> Self {
        Self { quoter }
    }

    fn type_sql(&self, column: &ColumnSchema) -> String {
        match column.column_type {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Decimal => match (column.length, column.precision) {
                (Some(length), Some(precision)) => format!("DECIMAL({},{})", length, precision),
                _ => "DECIMAL".to_string(),
            },
            ColumnType::String => match column.length {
                Some(length) => format!("VARCHAR({})", length),
                None => "VARCHAR".to_string(),
            },
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Datetime => "DATETIME".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Uuid => "CHAR(36)".to_string(),
            ColumnType::Binary => "BLOB".to_string(),
        }
    }
}

/// Split `DECIMAL(10,2)` into `("decimal", [10, 2])`
fn split_type(type_name: &str) -> (String, Vec<u32>) {
    let lower = type_name.trim().to_ascii_lowercase();
    match lower.split_once('(') {
        Some((base, rest)) => {
            let args = rest
                .trim_end_matches(')')
                .split(',')
                .filter_map(|a| a.trim().parse::<u32>().ok())
                .collect();
            (base.trim().to_string(), args)
        }
        None => (lower, Vec::new()),
    }
}

impl SchemaDialect for SqliteSchema {
    fn quoter(&self) -> IdentifierQuoter {
        self.quoter
    }

    fn list_tables_sql(&self, _schema: Option<&str>) -> (String, Vec<Value>) {
        (
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name <> 'sqlite_sequence' ORDER BY name"
                .to_string(),
            Vec::new(),
        )
    }

    fn describe_table_sql(&self, table: &str, _schema: Option<&str>) -> (String, Vec<Value>) {
        (
            format!("PRAGMA table_info({})", self.quoter.quote(table)),
            Vec::new(),
        )
    }

    fn convert_column_description(&self, row: &ReflectedColumn) -> ColumnSchema {
        let (base, args) = split_type(&row.type_name);
        let mut column = match base.as_str() {
            "bigint" => ColumnSchema::new(ColumnType::BigInteger),
            "boolean" => ColumnSchema::new(ColumnType::Boolean),
            "char" if args.first() == Some(&36) => ColumnSchema::new(ColumnType::Uuid),
            "char" | "varchar" | "nvarchar" | "character" => {
                let mut column = ColumnSchema::new(ColumnType::String);
                column.length = args.first().copied();
                column
            }
            "text" | "clob" => ColumnSchema::new(ColumnType::Text),
            "float" | "real" | "double" => ColumnSchema::new(ColumnType::Float),
            "decimal" | "numeric" => {
                let mut column = ColumnSchema::new(ColumnType::Decimal);
                column.length = args.first().copied();
                column.precision = args.get(1).copied();
                column
            }
            "date" => ColumnSchema::new(ColumnType::Date),
            "time" => ColumnSchema::new(ColumnType::Time),
            "datetime" => ColumnSchema::new(ColumnType::Datetime),
            "timestamp" => ColumnSchema::new(ColumnType::Timestamp),
            "blob" => ColumnSchema::new(ColumnType::Binary),
            other if other.contains("int") => ColumnSchema::new(ColumnType::Integer),
            _ => ColumnSchema::new(ColumnType::Text),
        };
        column.null = row.null;
        column.autoincrement = row.autoincrement;
        column.default = parse_default(row.default.as_deref(), column.column_type);
        column
    }

    fn column_sql(&self, table: &TableSchema, name: &str, column: &ColumnSchema) -> String {
        if table.is_identity_column(name) {
            return format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", self.quoter.quote(name));
        }
        let mut out = format!("{} {}", self.quoter.quote(name), self.type_sql(column));
        out.push_str(&nullability_sql(table, name, column));
        out
    }

    fn constraint_sql(&self, table: &TableSchema, constraint: &Constraint) -> Option<String> {
        // An identity column already declares the primary key inline
        if constraint.kind == ConstraintKind::Primary
            && constraint.columns.len() == 1
            && table.is_identity_column(&constraint.columns[0])
        {
            return None;
        }
        Some(key_sql(&self.quoter, constraint))
    }

    fn truncate_table_sql(&self, table: &TableSchema) -> Vec<String> {
        vec![
            format!(
                "DELETE FROM sqlite_sequence WHERE name = {}",
                Value::from(table.name.as_str()).to_sql_literal()
            ),
            format!("DELETE FROM {}", self.quoter.quote(&table.name)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> SqliteSchema {
        SqliteSchema::new(IdentifierQuoter::new('"', '"'))
    }

    #[test]
    fn test_create_table_sql() {
        let table = TableSchema::new("tags")
            .add_column("id", ColumnSchema::new(ColumnType::Integer).not_null())
            .add_column("name", ColumnSchema::new(ColumnType::String).length(20).not_null())
            .add_constraint(Constraint::primary(vec!["id".to_string()]))
            .add_constraint(Constraint {
                name: "name_unique".to_string(),
                kind: ConstraintKind::Unique,
                columns: vec!["name".to_string()],
                references: None,
            });
        let sql = schema().create_table_sql(&table).unwrap();
        assert_eq!(
            sql[0],
            "CREATE TABLE \"tags\" (\n\
             \"id\" INTEGER PRIMARY KEY AUTOINCREMENT,\n\
             \"name\" VARCHAR(20) NOT NULL,\n\
             CONSTRAINT \"name_unique\" UNIQUE (\"name\")\n)"
        );
    }

    #[test]
    fn test_composite_primary_key_is_a_constraint() {
        let table = TableSchema::new("pairs")
            .add_column("a", ColumnSchema::new(ColumnType::Integer).not_null())
            .add_column("b", ColumnSchema::new(ColumnType::Integer).not_null())
            .add_constraint(Constraint::primary(vec!["a".to_string(), "b".to_string()]));
        let sql = schema().create_table_sql(&table).unwrap();
        assert!(sql[0].contains("\"a\" INTEGER NOT NULL"));
        assert!(sql[0].contains("CONSTRAINT \"primary\" PRIMARY KEY (\"a\", \"b\")"));
    }

    #[test]
    fn test_truncate_uses_delete() {
        let table = TableSchema::new("tags");
        assert_eq!(
            schema().truncate_table_sql(&table),
            vec![
                "DELETE FROM sqlite_sequence WHERE name = 'tags'",
                "DELETE FROM \"tags\"",
            ]
        );
        assert_eq!(schema().identity_insert_sql(&table, true), None);
    }

    #[test]
    fn test_convert_column_description() {
        let schema = schema();
        let row = ReflectedColumn {
            name: "price".to_string(),
            type_name: "DECIMAL(10,2)".to_string(),
            null: false,
            default: Some("'1.5'".to_string()),
            ..ReflectedColumn::default()
        };
        let column = schema.convert_column_description(&row);
        assert_eq!(column.column_type, ColumnType::Decimal);
        assert_eq!((column.length, column.precision), (Some(10), Some(2)));
        assert!(!column.null);
        assert_eq!(column.default, Some(Value::String("1.5".to_string())));

        let uuid = ReflectedColumn {
            type_name: "CHAR(36)".to_string(),
            ..ReflectedColumn::default()
        };
        assert_eq!(schema.convert_column_description(&uuid).column_type, ColumnType::Uuid);

        let unknown = ReflectedColumn {
            type_name: "JSON".to_string(),
            ..ReflectedColumn::default()
        };
        assert_eq!(schema.convert_column_description(&unknown).column_type, ColumnType::Text);

        let int = ReflectedColumn {
            type_name: "SMALLINT".to_string(),
            ..ReflectedColumn::default()
        };
        assert_eq!(schema.convert_column_description(&int).column_type, ColumnType::Integer);
    }

    #[test]
    fn test_reflection_sql() {
        let (sql, params) = schema().describe_table_sql("tags", None);
        assert_eq!(sql, "PRAGMA table_info(\"tags\")");
        assert!(params.is_empty());
        assert!(schema().list_tables_sql(None).0.contains("sqlite_master"));
    }
}
