//! Expression AST definitions.

use crate::compiler::QueryCompiler;
use crate::expression::binder::ValueBinder;
use crate::expression::comparison::Comparison;
use crate::expression::function::FunctionExpression;
use crate::expression::tuple::TupleComparison;
use crate::query::SelectQuery;
use crate::value::{BindType, Value};

/// Rendering state threaded through `sql()` calls
pub struct SqlContext<'a> {
    /// Receives placeholders for bound values
    pub binder: &'a mut ValueBinder,
    /// Supplies identifier quoting and sub-query compilation
    pub compiler: &'a QueryCompiler,
}

impl<'a> SqlContext<'a> {
    pub fn new(binder: &'a mut ValueBinder, compiler: &'a QueryCompiler) -> Self {
        Self { binder, compiler }
    }

    /// Compile a nested query with the same binder and compiler
    pub fn subquery(&mut self, query: &SelectQuery) -> String {
        self.compiler.compile_select(query, self.binder)
    }
}

/// Logical connective joining a group of conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// The closed set of expression node kinds, used by dialects to declare
/// which kinds they rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Literal,
    Identifier,
    Value,
    Comparison,
    Function,
    TupleComparison,
    Conjunction,
    Exists,
    Subquery,
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Raw SQL text emitted verbatim
    Literal(String),

    /// Column or table identifier, quoted when the compiler quotes identifiers
    Identifier(String),

    /// Value bound through the binder
    Value {
        value: Value,
        bind_type: Option<BindType>,
    },

    /// Binary predicate `field OP value`
    Comparison(Comparison),

    /// Function call
    Function(FunctionExpression),

    /// `(a, b) OP (...)`
    Tuple(TupleComparison),

    /// Group of conditions joined by AND / OR
    Conjunction {
        conjunction: Conjunction,
        parts: Vec<Expression>,
    },

    /// `EXISTS (sub-query)`
    Exists {
        query: Box<SelectQuery>,
        negated: bool,
    },

    /// Nested select
    Subquery(Box<SelectQuery>),
}

impl Expression {
    /// Create a raw SQL literal
    pub fn literal(sql: impl Into<String>) -> Self {
        Expression::Literal(sql.into())
    }

    /// Create an identifier reference
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    /// Create a bound value with its natural bind type
    pub fn value(value: impl Into<Value>) -> Self {
        let value = value.into();
        let bind_type = value.bind_type();
        Expression::Value { value, bind_type }
    }

    /// Create a bound value with an explicit bind type
    pub fn typed_value(value: impl Into<Value>, bind_type: BindType) -> Self {
        Expression::Value {
            value: value.into(),
            bind_type: Some(bind_type),
        }
    }

    /// Create a function call expression
    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function(FunctionExpression::with_args(name, args))
    }

    /// Join conditions with AND
    pub fn and(parts: Vec<Expression>) -> Self {
        Expression::Conjunction {
            conjunction: Conjunction::And,
            parts,
        }
    }

    /// Join conditions with OR
    pub fn or(parts: Vec<Expression>) -> Self {
        Expression::Conjunction {
            conjunction: Conjunction::Or,
            parts,
        }
    }

    /// Wrap a query as a nested select
    pub fn subquery(query: SelectQuery) -> Self {
        Expression::Subquery(Box::new(query))
    }

    /// Create an `EXISTS (...)` predicate
    pub fn exists(query: SelectQuery) -> Self {
        Expression::Exists {
            query: Box::new(query),
            negated: false,
        }
    }

    /// Create a `NOT EXISTS (...)` predicate
    pub fn not_exists(query: SelectQuery) -> Self {
        Expression::Exists {
            query: Box::new(query),
            negated: true,
        }
    }

    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Literal(_) => ExpressionKind::Literal,
            Expression::Identifier(_) => ExpressionKind::Identifier,
            Expression::Value { .. } => ExpressionKind::Value,
            Expression::Comparison(_) => ExpressionKind::Comparison,
            Expression::Function(_) => ExpressionKind::Function,
            Expression::Tuple(_) => ExpressionKind::TupleComparison,
            Expression::Conjunction { .. } => ExpressionKind::Conjunction,
            Expression::Exists { .. } => ExpressionKind::Exists,
            Expression::Subquery(_) => ExpressionKind::Subquery,
        }
    }

    /// Number of placeholders this node consumes when rendered with a
    /// binding (non-inline) binder
    pub fn count(&self) -> usize {
        match self {
            Expression::Literal(_) | Expression::Identifier(_) => 0,
            Expression::Value { .. } => 1,
            Expression::Comparison(c) => c.count(),
            Expression::Function(f) => f.args().iter().map(Expression::count).sum(),
            Expression::Tuple(t) => t.count(),
            Expression::Conjunction { parts, .. } => parts.iter().map(Expression::count).sum(),
            // Nested queries allocate their own placeholders at compile time
            Expression::Exists { .. } | Expression::Subquery(_) => 0,
        }
    }

    /// Build a new node whose direct child expressions have been replaced
    /// by `f`. Nested queries are left for the caller to handle.
    pub fn map_children(&self, f: &mut dyn FnMut(&Expression) -> Expression) -> Expression {
        match self {
            Expression::Literal(_)
            | Expression::Identifier(_)
            | Expression::Value { .. }
            | Expression::Exists { .. }
            | Expression::Subquery(_) => self.clone(),
            Expression::Comparison(c) => Expression::Comparison(c.map_operands(f)),
            Expression::Function(func) => {
                let args = func.args().iter().map(|arg| f(arg)).collect();
                Expression::Function(func.with_replaced_args(args))
            }
            Expression::Tuple(t) => Expression::Tuple(t.clone()),
            Expression::Conjunction { conjunction, parts } => Expression::Conjunction {
                conjunction: *conjunction,
                parts: parts.iter().map(|p| f(p)).collect(),
            },
        }
    }

    /// Render this node to SQL
    pub fn sql(&self, ctx: &mut SqlContext<'_>) -> String {
        match self {
            Expression::Literal(sql) => sql.clone(),
            Expression::Identifier(name) => ctx.compiler.quote(name),
            Expression::Value { value, bind_type } => ctx.binder.bind_value(value, *bind_type),
            Expression::Comparison(c) => c.sql(ctx),
            Expression::Function(f) => f.sql(ctx),
            Expression::Tuple(t) => t.sql(ctx),
            Expression::Conjunction { conjunction, parts } => {
                let live: Vec<&Expression> =
                    parts.iter().filter(|p| !p.is_empty_conjunction()).collect();
                if live.len() == 1 {
                    return live[0].sql(ctx);
                }
                let rendered: Vec<String> = live.iter().map(|p| p.sql_grouped(ctx)).collect();
                rendered.join(&format!(" {} ", conjunction.as_str()))
            }
            Expression::Exists { query, negated } => {
                let inner = ctx.subquery(query);
                if *negated {
                    format!("NOT EXISTS ({})", inner)
                } else {
                    format!("EXISTS ({})", inner)
                }
            }
            Expression::Subquery(query) => ctx.subquery(query),
        }
    }

    /// Render with parentheses when the node would otherwise change meaning
    /// inside a larger boolean expression or operand position
    pub fn sql_grouped(&self, ctx: &mut SqlContext<'_>) -> String {
        match self {
            Expression::Conjunction { parts, .. } => {
                let live: Vec<&Expression> =
                    parts.iter().filter(|p| !p.is_empty_conjunction()).collect();
                match live.as_slice() {
                    [] => String::new(),
                    // A lone part stands in for the whole node
                    [only] => only.sql_grouped(ctx),
                    _ => format!("({})", self.sql(ctx)),
                }
            }
            Expression::Subquery(_) => format!("({})", self.sql(ctx)),
            _ => self.sql(ctx),
        }
    }

    /// Render with a default, non-quoting compiler, mostly useful in tests and logs
    pub fn to_sql(&self, binder: &mut ValueBinder) -> String {
        let compiler = QueryCompiler::default();
        let mut ctx = SqlContext::new(binder, &compiler);
        self.sql(&mut ctx)
    }

    /// True for a conjunction with nothing to render, however deeply nested
    fn is_empty_conjunction(&self) -> bool {
        match self {
            Expression::Conjunction { parts, .. } => {
                parts.iter().all(Expression::is_empty_conjunction)
            }
            _ => false,
        }
    }
}

impl From<Comparison> for Expression {
    fn from(c: Comparison) -> Self {
        Expression::Comparison(c)
    }
}

impl From<FunctionExpression> for Expression {
    fn from(f: FunctionExpression) -> Self {
        Expression::Function(f)
    }
}

impl From<TupleComparison> for Expression {
    fn from(t: TupleComparison) -> Self {
        Expression::Tuple(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_identifier() {
        let mut binder = ValueBinder::new();
        assert_eq!(Expression::literal("SELECT NULL").to_sql(&mut binder), "SELECT NULL");
        assert_eq!(Expression::identifier("users.id").to_sql(&mut binder), "users.id");
        assert!(binder.bindings().is_empty());
    }

    #[test]
    fn test_value_binding() {
        let mut binder = ValueBinder::new();
        let sql = Expression::value(30).to_sql(&mut binder);
        assert_eq!(sql, ":c0");
        assert_eq!(binder.bindings()[0].value, Value::Integer(30));
        assert_eq!(binder.bindings()[0].bind_type, Some(BindType::Integer));
    }

    #[test]
    fn test_nested_conjunction_is_grouped() {
        let mut binder = ValueBinder::inline();
        let expr = Expression::or(vec![
            Expression::and(vec![
                Comparison::new("a", 1, "=").into(),
                Comparison::new("b", 2, "=").into(),
            ]),
            Comparison::new("c", 3, "=").into(),
        ]);
        assert_eq!(expr.to_sql(&mut binder), "(a = 1 AND b = 2) OR c = 3");
    }

    #[test]
    fn test_single_part_conjunction_keeps_inner_grouping() {
        let mut binder = ValueBinder::inline();
        let expr = Expression::and(vec![
            Expression::and(vec![Expression::or(vec![
                Comparison::new("a", 1, "=").into(),
                Comparison::new("b", 2, "=").into(),
            ])]),
            Comparison::new("c", 3, "=").into(),
        ]);
        assert_eq!(expr.to_sql(&mut binder), "(a = 1 OR b = 2) AND c = 3");

        let nested_empty = Expression::and(vec![
            Expression::or(vec![Expression::and(vec![])]),
            Comparison::new("d", 4, "=").into(),
        ]);
        assert_eq!(nested_empty.to_sql(&mut binder), "d = 4");
    }

    #[test]
    fn test_empty_conjunction_parts_are_skipped() {
        let mut binder = ValueBinder::inline();
        let expr = Expression::and(vec![
            Expression::and(vec![]),
            Comparison::new("a", 1, "=").into(),
        ]);
        assert_eq!(expr.to_sql(&mut binder), "a = 1");
    }

    #[test]
    fn test_kind_and_count() {
        let cmp: Expression = Comparison::new("age", 30, ">").into();
        assert_eq!(cmp.kind(), ExpressionKind::Comparison);
        assert_eq!(cmp.count(), 1);
        assert_eq!(Expression::literal("1").count(), 0);
        let func = Expression::function("COALESCE", vec![Expression::value(1), Expression::value(2)]);
        assert_eq!(func.count(), 2);
    }

    #[test]
    fn test_map_children_builds_new_node() {
        let original = Expression::function("NOW", vec![]);
        let outer = Expression::and(vec![original.clone()]);
        let mapped = outer.map_children(&mut |_| Expression::literal("X"));
        assert_eq!(mapped, Expression::and(vec![Expression::literal("X")]));
        assert_eq!(outer, Expression::and(vec![original]));
    }
}
