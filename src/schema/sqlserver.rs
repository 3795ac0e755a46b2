//! SQL Server schema dialect.

use crate::dialect::IdentifierQuoter;
use crate::schema::table::{ColumnSchema, ColumnType, Constraint, ReflectedColumn, TableSchema};
use crate::schema::{key_sql, nullability_sql, parse_default, SchemaDialect};
use crate::value::Value;

const DEFAULT_SCHEMA: &str = "dbo";
const DEFAULT_STRING_LENGTH: u32 = 255;

#[derive(Debug, Clone, Copy)]
pub struct SqlServerSchema {
    quoter: IdentifierQuoter,
}

impl SqlServerSchema {
    pub fn new(quoter: IdentifierQuoter) -> Self {
        Self { quoter }
    }

    fn type_sql(&self, column: &ColumnSchema) -> String {
        match column.column_type {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::BigInteger => "BIGINT".to_string(),
            ColumnType::Boolean => "BIT".to_string(),
            ColumnType::Float => "FLOAT".to_string(),
            ColumnType::Decimal => match (column.length, column.precision) {
                (Some(length), Some(precision)) => format!("DECIMAL({}, {})", length, precision),
                (Some(length), None) => format!("DECIMAL({})", length),
                _ => "DECIMAL".to_string(),
            },
            ColumnType::String => format!(
                "NVARCHAR({})",
                column.length.unwrap_or(DEFAULT_STRING_LENGTH)
            ),
            ColumnType::Text => "NVARCHAR(MAX)".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time => "TIME".to_string(),
            ColumnType::Datetime | ColumnType::Timestamp => "DATETIME".to_string(),
            ColumnType::Uuid => "UNIQUEIDENTIFIER".to_string(),
            ColumnType::Binary => match column.length {
                Some(length) => format!("VARBINARY({})", length),
                None => "VARBINARY(MAX)".to_string(),
            },
        }
    }
}

impl SchemaDialect for SqlServerSchema {
    fn quoter(&self) -> IdentifierQuoter {
        self.quoter
    }

    fn list_tables_sql(&self, schema: Option<&str>) -> (String, Vec<Value>) {
        (
            "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME"
                .to_string(),
            vec![Value::from(schema.unwrap_or(DEFAULT_SCHEMA))],
        )
    }

    fn describe_table_sql(&self, table: &str, schema: Option<&str>) -> (String, Vec<Value>) {
        (
            "SELECT COLUMN_NAME AS [name], DATA_TYPE AS [type], \
             CHARACTER_MAXIMUM_LENGTH AS [char_length], NUMERIC_PRECISION AS [precision], \
             NUMERIC_SCALE AS [scale], IS_NULLABLE AS [null], COLUMN_DEFAULT AS [default], \
             COLUMNPROPERTY(OBJECT_ID(TABLE_SCHEMA + '.' + TABLE_NAME), COLUMN_NAME, 'IsIdentity') \
             AS [autoincrement] \
             FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_NAME = ? AND TABLE_SCHEMA = ? ORDER BY ORDINAL_POSITION"
                .to_string(),
            vec![
                Value::from(table),
                Value::from(schema.unwrap_or(DEFAULT_SCHEMA)),
            ],
        )
    }

    fn convert_column_description(&self, row: &ReflectedColumn) -> ColumnSchema {
        let type_name = row.type_name.to_ascii_lowercase();
        let char_length = row
            .char_length
            .filter(|l| *l > 0)
            .and_then(|l| u32::try_from(l).ok());
        let is_max = row.char_length == Some(-1);

        let mut column = match type_name.as_str() {
            "date" => ColumnSchema::new(ColumnType::Date),
            "time" => ColumnSchema::new(ColumnType::Time),
            "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" => {
                ColumnSchema::new(ColumnType::Datetime)
            }
            "tinyint" | "smallint" | "int" | "integer" => ColumnSchema::new(ColumnType::Integer),
            "bigint" => ColumnSchema::new(ColumnType::BigInteger),
            "bit" => ColumnSchema::new(ColumnType::Boolean),
            "float" | "real" => ColumnSchema::new(ColumnType::Float),
            "decimal" | "numeric" | "money" | "smallmoney" => {
                let mut column = ColumnSchema::new(ColumnType::Decimal);
                column.length = row.precision;
                column.precision = row.scale;
                column
            }
            "char" | "nchar" | "varchar" | "nvarchar" if is_max => {
                ColumnSchema::new(ColumnType::Text)
            }
            "char" | "nchar" | "varchar" | "nvarchar" => {
                let mut column = ColumnSchema::new(ColumnType::String);
                column.length = char_length;
                column
            }
            "text" | "ntext" => ColumnSchema::new(ColumnType::Text),
            "uniqueidentifier" => ColumnSchema::new(ColumnType::Uuid),
            "image" | "binary" | "varbinary" => {
                let mut column = ColumnSchema::new(ColumnType::Binary);
                column.length = char_length;
                column
            }
            _ => {
                let mut column = ColumnSchema::new(ColumnType::String);
                column.length = char_length;
                column
            }
        };
        column.null = row.null;
        column.autoincrement = row.autoincrement;
        column.default = parse_default(row.default.as_deref(), column.column_type);
        column
    }

    fn column_sql(&self, table: &TableSchema, name: &str, column: &ColumnSchema) -> String {
        let mut out = format!("{} {}", self.quoter.quote(name), self.type_sql(column));
        if column.autoincrement || table.is_identity_column(name) {
            out.push_str(" IDENTITY(1, 1)");
        }
        out.push_str(&nullability_sql(table, name, column));
        out
    }

    fn constraint_sql(&self, _table: &TableSchema, constraint: &Constraint) -> Option<String> {
        Some(key_sql(&self.quoter, constraint))
    }

    fn truncate_table_sql(&self, table: &TableSchema) -> Vec<String> {
        vec![format!("TRUNCATE TABLE {}", self.quoter.quote(&table.name))]
    }

    fn identity_insert_sql(&self, table: &TableSchema, enabled: bool) -> Option<String> {
        let has_identity = table
            .columns
            .iter()
            .any(|(name, column)| column.autoincrement || table.is_identity_column(name));
        has_identity.then(|| {
            format!(
                "SET IDENTITY_INSERT {} {}",
                self.quoter.quote(&table.name),
                if enabled { "ON" } else { "OFF" }
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> SqlServerSchema {
        SqlServerSchema::new(IdentifierQuoter::new('[', ']'))
    }

    fn articles() -> TableSchema {
        TableSchema::new("articles")
            .add_column("id", ColumnSchema::new(ColumnType::Integer).not_null())
            .add_column("title", ColumnSchema::new(ColumnType::String).length(100))
            .add_column("body", ColumnSchema::new(ColumnType::Text))
            .add_column(
                "published",
                ColumnSchema::new(ColumnType::Boolean)
                    .not_null()
                    .default_value(false),
            )
            .add_constraint(Constraint::primary(vec!["id".to_string()]))
    }

    #[test]
    fn test_create_table_sql() {
        let sql = schema().create_table_sql(&articles()).unwrap();
        assert_eq!(
            sql,
            vec![
                "CREATE TABLE [articles] (\n\
                 [id] INTEGER IDENTITY(1, 1) NOT NULL,\n\
                 [title] NVARCHAR(100) DEFAULT NULL,\n\
                 [body] NVARCHAR(MAX) DEFAULT NULL,\n\
                 [published] BIT NOT NULL DEFAULT 0,\n\
                 CONSTRAINT [primary] PRIMARY KEY ([id])\n)"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_column_types() {
        let table = TableSchema::new("t");
        let schema = schema();
        let cases = [
            (ColumnSchema::new(ColumnType::String), "[c] NVARCHAR(255) DEFAULT NULL"),
            (
                ColumnSchema::new(ColumnType::Decimal).length(10).precision(2).not_null(),
                "[c] DECIMAL(10, 2) NOT NULL",
            ),
            (
                ColumnSchema::new(ColumnType::Uuid).not_null(),
                "[c] UNIQUEIDENTIFIER NOT NULL",
            ),
            (
                ColumnSchema::new(ColumnType::Binary).not_null(),
                "[c] VARBINARY(MAX) NOT NULL",
            ),
            (
                ColumnSchema::new(ColumnType::Timestamp).not_null(),
                "[c] DATETIME NOT NULL",
            ),
        ];
        for (column, expected) in cases {
            assert_eq!(schema.column_sql(&table, "c", &column), expected);
        }
    }

    #[test]
    fn test_drop_and_truncate() {
        let table = articles();
        assert_eq!(schema().drop_table_sql(&table), vec!["DROP TABLE [articles]"]);
        assert_eq!(
            schema().truncate_table_sql(&table),
            vec!["TRUNCATE TABLE [articles]"]
        );
    }

    #[test]
    fn test_identity_insert() {
        assert_eq!(
            schema().identity_insert_sql(&articles(), true),
            Some("SET IDENTITY_INSERT [articles] ON".to_string())
        );
        let keyless = TableSchema::new("tags")
            .add_column("name", ColumnSchema::new(ColumnType::String));
        assert_eq!(schema().identity_insert_sql(&keyless, true), None);
    }

    #[test]
    fn test_reflection_sql() {
        let (sql, params) = schema().list_tables_sql(None);
        assert!(sql.contains("INFORMATION_SCHEMA.TABLES"));
        assert_eq!(params, vec![Value::from("dbo")]);

        let (sql, params) = schema().describe_table_sql("articles", Some("blog"));
        assert!(sql.contains("INFORMATION_SCHEMA.COLUMNS"));
        assert_eq!(params, vec![Value::from("articles"), Value::from("blog")]);
    }

    #[test]
    fn test_convert_column_description() {
        let schema = schema();
        let row = ReflectedColumn {
            name: "title".to_string(),
            type_name: "nvarchar".to_string(),
            char_length: Some(100),
            null: true,
            ..ReflectedColumn::default()
        };
        let column = schema.convert_column_description(&row);
        assert_eq!(column.column_type, ColumnType::String);
        assert_eq!(column.length, Some(100));
        assert!(column.null);

        let max = ReflectedColumn {
            type_name: "NVARCHAR".to_string(),
            char_length: Some(-1),
            ..row.clone()
        };
        assert_eq!(
            schema.convert_column_description(&max).column_type,
            ColumnType::Text
        );

        let money = ReflectedColumn {
            type_name: "decimal".to_string(),
            char_length: None,
            precision: Some(10),
            scale: Some(2),
            default: Some("((0))".to_string()),
            ..row
        };
        let column = schema.convert_column_description(&money);
        assert_eq!(column.column_type, ColumnType::Decimal);
        assert_eq!((column.length, column.precision), (Some(10), Some(2)));
        assert_eq!(column.default, Some(Value::Float(0.0)));
    }
}
