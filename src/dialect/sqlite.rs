//! SQLite dialect.

use crate::compiler::{PagingStyle, QueryCompiler};
use crate::dialect::{Dialect, FunctionTranslation, IdentifierQuoter};
use crate::expression::ExpressionKind;
use crate::schema::{SchemaDialect, SqliteSchema};

const QUOTER: IdentifierQuoter = IdentifierQuoter::new('"', '"');

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quoter(&self) -> IdentifierQuoter {
        QUOTER
    }

    fn expression_translators(&self) -> &'static [ExpressionKind] {
        &[ExpressionKind::Function]
    }

    fn function_translation(&self, name: &str) -> Option<FunctionTranslation> {
        match name {
            "CONCAT" => Some(FunctionTranslation::Infix("||")),
            "DATEDIFF" => Some(FunctionTranslation::WrapEach {
                name: "ROUND",
                conjunction: "-",
                wrapper: "JULIANDAY",
            }),
            "NOW" => Some(FunctionTranslation::RenameWithLiteral {
                name: "DATETIME",
                literal: "'now'",
            }),
            "CURRENT_DATE" => Some(FunctionTranslation::RenameWithLiteral {
                name: "DATE",
                literal: "'now'",
            }),
            "CURRENT_TIME" => Some(FunctionTranslation::RenameWithLiteral {
                name: "TIME",
                literal: "'now'",
            }),
            _ => None,
        }
    }

    fn schema_dialect(&self) -> Box<dyn SchemaDialect> {
        Box::new(SqliteSchema::new(QUOTER))
    }

    fn new_compiler(&self) -> QueryCompiler {
        QueryCompiler::new(PagingStyle::LimitOffset, QUOTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Expression, FunctionExpression, TupleComparison, ValueBinder};
    use crate::query::SelectQuery;

    #[test]
    fn test_function_translations() {
        let dialect = SqliteDialect;
        let concat = Expression::function(
            "CONCAT",
            vec![Expression::identifier("a"), Expression::identifier("b")],
        );
        let mut binder = ValueBinder::new();
        assert_eq!(
            dialect.translate_expression(&concat).to_sql(&mut binder),
            "(a || b)"
        );
        let now = Expression::Function(FunctionExpression::new("NOW"));
        assert_eq!(
            dialect.translate_expression(&now).to_sql(&mut binder),
            "DATETIME('now')"
        );
    }

    #[test]
    fn test_paging_is_left_alone() {
        let query = SelectQuery::new().from("t").limit(5).offset(10);
        let sql = SqliteDialect.compile(&query, &mut ValueBinder::new());
        assert_eq!(sql, "SELECT * FROM t LIMIT 5 OFFSET 10");
    }

    #[test]
    fn test_tuple_comparison_is_native() {
        let tuple = TupleComparison::in_tuples(
            vec!["a".into(), "b".into()],
            vec![vec![1.into(), 2.into()], vec![3.into(), 4.into()]],
        );
        let query = SelectQuery::new().from("t").and_where(Expression::Tuple(tuple));
        let sql = SqliteDialect.compile(&query, &mut ValueBinder::new());
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE (a, b) IN ((:c0, :c1), (:c2, :c3))"
        );
    }

    #[test]
    fn test_default_savepoints() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.save_point_sql("2"), "SAVEPOINT LEVEL2");
        assert_eq!(dialect.release_save_point_sql("2"), "RELEASE SAVEPOINT LEVEL2");
        assert_eq!(
            dialect.rollback_save_point_sql("2"),
            "ROLLBACK TO SAVEPOINT LEVEL2"
        );
    }
}
