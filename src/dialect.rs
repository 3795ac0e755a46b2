//! SQL dialects: everything that diverges per database engine.
//!
//! A dialect supplies identifier quoting, paging translation, rewriting of
//! generic expressions into engine syntax, savepoint statements, a schema
//! dialect and a compiler. Compiling a query runs three stages:
//! `select_query_translator`, expression translation over the whole tree,
//! then serialization.

pub mod function_map;
pub mod quoter;
pub mod sqlite;
pub mod sqlserver;
pub mod tuple;

pub use function_map::FunctionTranslation;
pub use quoter::IdentifierQuoter;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

use crate::compiler::QueryCompiler;
use crate::expression::{
    Expression, ExpressionKind, FunctionExpression, TupleComparison, TupleValue, ValueBinder,
};
use crate::query::SelectQuery;
use crate::schema::SchemaDialect;
use log::{debug, trace};
use std::fmt;
use std::str::FromStr;

/// Engine-specific SQL generation rules
pub trait Dialect: fmt::Debug {
    /// Short engine name, e.g. `sqlserver`
    fn name(&self) -> &'static str;

    fn quoter(&self) -> IdentifierQuoter;

    fn start_quote(&self) -> char {
        self.quoter().start()
    }

    fn end_quote(&self) -> char {
        self.quoter().end()
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        self.quoter().quote(identifier)
    }

    /// Rewrite engine-specific clauses of a select (paging)
    fn select_query_translator(&self, query: SelectQuery) -> SelectQuery {
        query
    }

    /// Expression kinds this dialect rewrites
    fn expression_translators(&self) -> &'static [ExpressionKind] {
        &[]
    }

    /// Translation rule for a canonical (upper-case) function name
    fn function_translation(&self, _name: &str) -> Option<FunctionTranslation> {
        None
    }

    /// Rewrite a function call; unknown names pass through unchanged
    fn transform_function_expression(&self, function: &FunctionExpression) -> Expression {
        let canonical = function.name().to_ascii_uppercase();
        match self.function_translation(&canonical) {
            Some(rule) => {
                trace!("{}: translating function {} with {:?}", self.name(), canonical, rule);
                rule.apply(function)
            }
            None => Expression::Function(function.clone()),
        }
    }

    /// Rewrite a tuple comparison; engines with row values keep it
    fn transform_tuple_comparison(&self, tuple: &TupleComparison) -> Expression {
        Expression::Tuple(tuple.clone())
    }

    /// Translate an expression tree bottom-up, building new nodes
    fn translate_expression(&self, expression: &Expression) -> Expression {
        let rewrites = self.expression_translators();
        if let Expression::Tuple(tuple) = expression {
            if rewrites.contains(&ExpressionKind::TupleComparison) {
                // The replacement wraps the original operands in a fresh
                // sub-query, which is then translated as a whole
                return self.translate_expression(&self.transform_tuple_comparison(tuple));
            }
        }

        let rebuilt = match expression {
            Expression::Subquery(query) => {
                Expression::Subquery(Box::new(self.translate_query(query.as_ref().clone())))
            }
            Expression::Exists { query, negated } => Expression::Exists {
                query: Box::new(self.translate_query(query.as_ref().clone())),
                negated: *negated,
            },
            Expression::Tuple(tuple) => match tuple.value() {
                TupleValue::Subquery(query) => Expression::Tuple(tuple.with_value(
                    TupleValue::Subquery(Box::new(self.translate_query(query.as_ref().clone()))),
                )),
                TupleValue::Tuples(_) => expression.clone(),
            },
            other => other.map_children(&mut |child| self.translate_expression(child)),
        };

        if !rewrites.contains(&rebuilt.kind()) {
            return rebuilt;
        }
        match &rebuilt {
            Expression::Function(function) => self.transform_function_expression(function),
            Expression::Tuple(_)
            | Expression::Literal(_)
            | Expression::Identifier(_)
            | Expression::Value { .. }
            | Expression::Comparison(_)
            | Expression::Conjunction { .. }
            | Expression::Exists { .. }
            | Expression::Subquery(_) => rebuilt,
        }
    }

    /// Run the query translator, then translate every clause expression
    fn translate_query(&self, query: SelectQuery) -> SelectQuery {
        self.select_query_translator(query)
            .map_expressions(&mut |expr| self.translate_expression(expr))
    }

    /// SQL creating a savepoint. The name is not validated here.
    fn save_point_sql(&self, name: &str) -> String {
        format!("SAVEPOINT LEVEL{}", name)
    }

    /// SQL releasing a savepoint. The name is not validated here.
    fn release_save_point_sql(&self, name: &str) -> String {
        format!("RELEASE SAVEPOINT LEVEL{}", name)
    }

    /// SQL rolling back to a savepoint. The name is not validated here.
    fn rollback_save_point_sql(&self, name: &str) -> String {
        format!("ROLLBACK TO SAVEPOINT LEVEL{}", name)
    }

    /// Schema reflection and DDL generation for this engine
    fn schema_dialect(&self) -> Box<dyn SchemaDialect>;

    fn new_compiler(&self) -> QueryCompiler;

    /// Translate and serialize a query with this dialect's compiler
    fn compile(&self, query: &SelectQuery, binder: &mut ValueBinder) -> String {
        self.compile_with(&self.new_compiler(), query, binder)
    }

    /// Translate a query, then serialize it with `compiler`
    fn compile_with(
        &self,
        compiler: &QueryCompiler,
        query: &SelectQuery,
        binder: &mut ValueBinder,
    ) -> String {
        debug!("Compiling select for {} dialect", self.name());
        let translated = self.translate_query(query.clone());
        compiler.compile_select(&translated, binder)
    }
}

/// Engines with a built-in dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    SqlServer,
    Sqlite,
}

impl DialectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialectKind::SqlServer => "sqlserver",
            DialectKind::Sqlite => "sqlite",
        }
    }

    pub fn dialect(&self) -> Box<dyn Dialect> {
        match self {
            DialectKind::SqlServer => Box::new(SqlServerDialect),
            DialectKind::Sqlite => Box::new(SqliteDialect),
        }
    }
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlserver" | "mssql" => Ok(DialectKind::SqlServer),
            "sqlite" => Ok(DialectKind::Sqlite),
            other => Err(format!("Unknown dialect: {}", other)),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
