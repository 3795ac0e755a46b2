//! Rewriting of tuple comparisons for engines without row-value support.
//!
//! `(a, b) IN (SELECT x, y FROM t)` becomes
//! `EXISTS (SELECT 1 FROM t WHERE a = x AND b = y)`, and a list of literal
//! rows becomes `EXISTS (SELECT 1 WHERE (a = :c0 AND b = :c1) OR (...))`.

use crate::expression::{Comparison, Expression, TupleComparison, TupleValue};
use crate::query::{SelectItem, SelectQuery};
use log::trace;

pub fn transform_tuple_comparison(tuple: &TupleComparison) -> Expression {
    let operator = tuple.operator().to_ascii_uppercase();
    let negated = tuple.is_negated();
    if matches!(tuple.value(), TupleValue::Tuples(rows) if rows.is_empty()) {
        return Expression::literal(tuple.empty_list_sql());
    }
    let field_operator = match operator.as_str() {
        "IN" | "NOT IN" | "!=" | "<>" => "=",
        _ => tuple.operator(),
    };

    let surrogate = match tuple.value() {
        TupleValue::Subquery(query) => {
            let mut query = query.as_ref().clone();
            let selected: Vec<Expression> =
                query.select.iter().map(|item| item.expression.clone()).collect();
            for (field, column) in tuple.fields().iter().zip(selected) {
                query.conditions.push(Expression::Comparison(Comparison::with_expression(
                    Expression::identifier(field.clone()),
                    field_operator,
                    column,
                )));
            }
            query.with_select(vec![SelectItem::new(Expression::literal("1"))])
        }
        TupleValue::Tuples(rows) => {
            let alternatives = rows
                .iter()
                .map(|row| {
                    let parts = tuple
                        .fields()
                        .iter()
                        .zip(row)
                        .enumerate()
                        .map(|(i, (field, value))| {
                            let mut cmp =
                                Comparison::new(field.clone(), value.clone(), field_operator);
                            if let Some(Some(bind_type)) = tuple.types().get(i) {
                                cmp = cmp.with_bind_type(*bind_type);
                            }
                            Expression::Comparison(cmp)
                        })
                        .collect();
                    Expression::and(parts)
                })
                .collect();
            SelectQuery::new()
                .select(Expression::literal("1"))
                .and_where(Expression::or(alternatives))
        }
    };

    trace!(
        "Rewrote tuple comparison on ({}) into EXISTS",
        tuple.fields().join(", ")
    );
    if negated {
        Expression::not_exists(surrogate)
    } else {
        Expression::exists(surrogate)
    }
}
