//! SQL Server (T-SQL) dialect.

use crate::compiler::{PagingStyle, QueryCompiler};
use crate::dialect::tuple::transform_tuple_comparison;
use crate::dialect::{Dialect, FunctionTranslation, IdentifierQuoter};
use crate::expression::{Expression, ExpressionKind, TupleComparison};
use crate::query::SelectQuery;
use crate::schema::{SchemaDialect, SqlServerSchema};
use log::trace;

const QUOTER: IdentifierQuoter = IdentifierQuoter::new('[', ']');

/// Modifier key under which the automatic `TOP n` is installed
pub const AUTO_TOP_MODIFIER: &str = "_auto_top_";

/// Ordering injected when an offset is requested without an ORDER BY;
/// `OFFSET ... ROWS` is only valid after an ORDER BY clause
pub const NULL_ORDERING: &str = "(SELECT NULL)";

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quoter(&self) -> IdentifierQuoter {
        QUOTER
    }

    fn select_query_translator(&self, query: SelectQuery) -> SelectQuery {
        let mut query = query;
        if let (Some(limit), None) = (query.limit, query.offset) {
            trace!("Installing TOP {} modifier", limit);
            query = query.modifier(AUTO_TOP_MODIFIER, format!("TOP {}", limit));
        }
        if query.offset.is_some() && query.order_by.is_empty() {
            query = query.order_by_expression(Expression::literal(NULL_ORDERING));
        }
        query
    }

    fn expression_translators(&self) -> &'static [ExpressionKind] {
        &[ExpressionKind::Function, ExpressionKind::TupleComparison]
    }

    fn function_translation(&self, name: &str) -> Option<FunctionTranslation> {
        match name {
            "CONCAT" => Some(FunctionTranslation::Infix("+")),
            "DATEDIFF" => Some(FunctionTranslation::PrependLiteral("day")),
            "CURRENT_DATE" => Some(FunctionTranslation::Convert {
                target: "date",
                now: "GETUTCDATE",
            }),
            "CURRENT_TIME" => Some(FunctionTranslation::Convert {
                target: "time",
                now: "GETUTCDATE",
            }),
            "NOW" => Some(FunctionTranslation::Rename("GETUTCDATE")),
            _ => None,
        }
    }

    fn transform_tuple_comparison(&self, tuple: &TupleComparison) -> Expression {
        transform_tuple_comparison(tuple)
    }

    fn save_point_sql(&self, name: &str) -> String {
        format!("SAVE TRANSACTION t{}", name)
    }

    fn release_save_point_sql(&self, name: &str) -> String {
        format!("COMMIT TRANSACTION t{}", name)
    }

    fn rollback_save_point_sql(&self, name: &str) -> String {
        format!("ROLLBACK TRANSACTION t{}", name)
    }

    fn schema_dialect(&self) -> Box<dyn SchemaDialect> {
        Box::new(SqlServerSchema::new(QUOTER))
    }

    fn new_compiler(&self) -> QueryCompiler {
        QueryCompiler::new(PagingStyle::OffsetFetch, QUOTER)
    }
}
