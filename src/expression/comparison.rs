//! Binary comparison predicates.

use crate::expression::expr::{Expression, SqlContext};
use crate::value::{BindType, TypeMap, Value};

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonValue {
    /// Bound through the value binder
    Value(Value),
    /// Nested expression, rendered in place
    Expression(Box<Expression>),
}

/// A predicate of the form `field OPERATOR value`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    field: Box<Expression>,
    value: ComparisonValue,
    operator: String,
    bind_type: Option<BindType>,
}

impl Comparison {
    /// Compare a field against a bound value
    pub fn new(field: impl Into<String>, value: impl Into<Value>, operator: &str) -> Self {
        Self {
            field: Box::new(Expression::Identifier(field.into())),
            value: ComparisonValue::Value(value.into()),
            operator: operator.to_string(),
            bind_type: None,
        }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, value, "=")
    }

    /// Compare an arbitrary left-hand expression against a nested expression
    pub fn with_expression(field: Expression, operator: &str, value: Expression) -> Self {
        Self {
            field: Box::new(field),
            value: ComparisonValue::Expression(Box::new(value)),
            operator: operator.to_string(),
            bind_type: None,
        }
    }

    /// Build from a single `(field, value)` condition. The bind type comes
    /// from `types` when the field is listed there; the operator is `=`.
    pub fn from_condition(condition: (&str, Value), types: &TypeMap) -> Self {
        let (field, value) = condition;
        Self {
            field: Box::new(Expression::Identifier(field.to_string())),
            value: ComparisonValue::Value(value),
            operator: "=".to_string(),
            bind_type: types.get(field).copied(),
        }
    }

    pub fn with_bind_type(mut self, bind_type: BindType) -> Self {
        self.bind_type = Some(bind_type);
        self
    }

    pub fn field(&self) -> &Expression {
        &self.field
    }

    pub fn value(&self) -> &ComparisonValue {
        &self.value
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn bind_type(&self) -> Option<BindType> {
        self.bind_type
    }

    /// A comparison always occupies exactly one bind slot
    pub fn count(&self) -> usize {
        1
    }

    /// New comparison with the field and nested value passed through `f`
    pub fn map_operands(&self, f: &mut dyn FnMut(&Expression) -> Expression) -> Self {
        let value = match &self.value {
            ComparisonValue::Value(v) => ComparisonValue::Value(v.clone()),
            ComparisonValue::Expression(e) => ComparisonValue::Expression(Box::new(f(e))),
        };
        Self {
            field: Box::new(f(&self.field)),
            value,
            operator: self.operator.clone(),
            bind_type: self.bind_type,
        }
    }

    pub fn sql(&self, ctx: &mut SqlContext<'_>) -> String {
        let field = self.field.sql(ctx);
        let value = match &self.value {
            ComparisonValue::Value(v) => ctx.binder.bind_value(v, self.bind_type),
            ComparisonValue::Expression(e) => match e.as_ref() {
                Expression::Identifier(_) | Expression::Literal(_) | Expression::Value { .. } => {
                    e.sql(ctx)
                }
                other => format!("({})", other.sql(ctx)),
            },
        };
        format!("{} {} {}", field, self.operator, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::binder::ValueBinder;
    use crate::expression::function::FunctionExpression;

    #[test]
    fn test_from_condition_defaults_to_equality() {
        let types = TypeMap::new();
        let cmp = Comparison::from_condition(("age", Value::from(30)), &types);
        assert_eq!(cmp.field(), &Expression::identifier("age"));
        assert_eq!(cmp.value(), &ComparisonValue::Value(Value::from(30)));
        assert_eq!(cmp.operator(), "=");
        assert_eq!(cmp.bind_type(), None);

        let mut binder = ValueBinder::new();
        assert_eq!(Expression::from(cmp.clone()).to_sql(&mut binder), "age = :c0");

        let mut inline = ValueBinder::inline();
        assert_eq!(Expression::from(cmp).to_sql(&mut inline), "age = 30");
    }

    #[test]
    fn test_from_condition_takes_type_from_map() {
        let mut types = TypeMap::new();
        types.insert("created".to_string(), BindType::Datetime);
        types.insert("other".to_string(), BindType::Integer);

        let cmp = Comparison::from_condition(("created", Value::from("2024-01-01")), &types);
        assert_eq!(cmp.bind_type(), Some(BindType::Datetime));

        let mut binder = ValueBinder::new();
        Expression::from(cmp).to_sql(&mut binder);
        assert_eq!(binder.bindings()[0].bind_type, Some(BindType::Datetime));
    }

    #[test]
    fn test_count_is_always_one() {
        let types = TypeMap::new();
        assert_eq!(Comparison::eq("a", 1).count(), 1);
        assert_eq!(Comparison::new("b", "x", "LIKE").count(), 1);
        assert_eq!(
            Comparison::from_condition(("c", Value::Null), &types).count(),
            1
        );
        let nested = Comparison::with_expression(
            Expression::identifier("d"),
            ">",
            FunctionExpression::new("NOW").into(),
        );
        assert_eq!(nested.count(), 1);
    }

    #[test]
    fn test_expression_value_is_parenthesized() {
        let cmp = Comparison::with_expression(
            Expression::identifier("created"),
            "<",
            FunctionExpression::new("NOW").into(),
        );
        let mut binder = ValueBinder::new();
        assert_eq!(Expression::from(cmp).to_sql(&mut binder), "created < (NOW())");
        assert!(binder.bindings().is_empty());
    }

    #[test]
    fn test_identifier_value_is_not_parenthesized() {
        let cmp = Comparison::with_expression(
            Expression::identifier("a.id"),
            "=",
            Expression::identifier("b.a_id"),
        );
        let mut binder = ValueBinder::new();
        assert_eq!(Expression::from(cmp).to_sql(&mut binder), "a.id = b.a_id");
    }

    #[test]
    fn test_custom_operator() {
        let cmp = Comparison::new("name", "J%", "LIKE").with_bind_type(BindType::String);
        let mut binder = ValueBinder::inline();
        assert_eq!(Expression::from(cmp).to_sql(&mut binder), "name LIKE 'J%'");
    }
}
