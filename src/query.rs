//! Select query builder.
//!
//! A `SelectQuery` accumulates clauses; dialects rewrite it and a
//! `QueryCompiler` turns it into SQL text.

use crate::expression::{Comparison, Expression};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expression: Expression,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableReference {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableReference,
    pub conditions: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub expression: Expression,
    /// `None` renders the expression without a direction keyword
    pub direction: Option<OrderDirection>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub distinct: bool,
    /// Keyed text placed right after `SELECT`, e.g. `TOP 10`
    pub modifiers: Vec<(String, String)>,
    pub select: Vec<SelectItem>,
    pub from: Vec<TableReference>,
    pub joins: Vec<Join>,
    /// WHERE conditions, joined with AND
    pub conditions: Vec<Expression>,
    pub group_by: Vec<Expression>,
    pub having: Vec<Expression>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, expression: Expression) -> Self {
        self.select.push(SelectItem::new(expression));
        self
    }

    pub fn select_as(mut self, expression: Expression, alias: impl Into<String>) -> Self {
        self.select.push(SelectItem {
            expression,
            alias: Some(alias.into()),
        });
        self
    }

    pub fn select_column(self, column: impl Into<String>) -> Self {
        self.select(Expression::Identifier(column.into()))
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from.push(TableReference {
            name: table.into(),
            alias: None,
        });
        self
    }

    pub fn from_as(mut self, table: impl Into<String>, alias: impl Into<String>) -> Self {
        self.from.push(TableReference {
            name: table.into(),
            alias: Some(alias.into()),
        });
        self
    }

    pub fn join(
        mut self,
        join_type: JoinType,
        table: impl Into<String>,
        alias: Option<String>,
        conditions: Vec<Expression>,
    ) -> Self {
        self.joins.push(Join {
            join_type,
            table: TableReference {
                name: table.into(),
                alias,
            },
            conditions,
        });
        self
    }

    /// Add a condition, AND-ed with the existing ones
    pub fn and_where(mut self, condition: impl Into<Expression>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add `field = value` conditions for every pair
    pub fn where_eq<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (field, value) in pairs {
            self.conditions
                .push(Expression::Comparison(Comparison::eq(field, value)));
        }
        self
    }

    pub fn group_by(mut self, expression: Expression) -> Self {
        self.group_by.push(expression);
        self
    }

    pub fn having(mut self, condition: impl Into<Expression>) -> Self {
        self.having.push(condition.into());
        self
    }

    pub fn order_by(mut self, expression: Expression, direction: OrderDirection) -> Self {
        self.order_by.push(OrderByItem {
            expression,
            direction: Some(direction),
        });
        self
    }

    /// Order by an expression without a direction keyword
    pub fn order_by_expression(mut self, expression: Expression) -> Self {
        self.order_by.push(OrderByItem {
            expression,
            direction: None,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Install a modifier, replacing any modifier with the same key
    pub fn modifier(mut self, key: impl Into<String>, sql: impl Into<String>) -> Self {
        let key = key.into();
        let sql = sql.into();
        match self.modifiers.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = sql,
            None => self.modifiers.push((key, sql)),
        }
        self
    }

    pub fn modifier_sql(&self, key: &str) -> Option<&str> {
        self.modifiers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the select list
    pub fn with_select(mut self, items: Vec<SelectItem>) -> Self {
        self.select = items;
        self
    }

    /// Build a new query with every clause expression passed through `f`
    pub fn map_expressions(self, f: &mut dyn FnMut(&Expression) -> Expression) -> Self {
        let select = self
            .select
            .into_iter()
            .map(|item| SelectItem {
                expression: f(&item.expression),
                alias: item.alias,
            })
            .collect();
        let joins = self
            .joins
            .into_iter()
            .map(|join| Join {
                conditions: join.conditions.iter().map(|c| f(c)).collect(),
                ..join
            })
            .collect();
        let conditions = self.conditions.iter().map(|c| f(c)).collect();
        let group_by = self.group_by.iter().map(|g| f(g)).collect();
        let having = self.having.iter().map(|h| f(h)).collect();
        let order_by = self
            .order_by
            .into_iter()
            .map(|item| OrderByItem {
                expression: f(&item.expression),
                direction: item.direction,
            })
            .collect();
        Self {
            select,
            joins,
            conditions,
            group_by,
            having,
            order_by,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_clauses() {
        let query = SelectQuery::new()
            .select_column("id")
            .select_as(Expression::identifier("name"), "user_name")
            .from_as("users", "u")
            .where_eq([("active", true)])
            .order_by(Expression::identifier("id"), OrderDirection::Desc)
            .limit(10);

        assert_eq!(query.select.len(), 2);
        assert_eq!(query.from[0].alias.as_deref(), Some("u"));
        assert_eq!(query.conditions.len(), 1);
        assert_eq!(query.order_by.len(), 1);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, None);
    }

    #[test]
    fn test_modifier_replaces_same_key() {
        let query = SelectQuery::new()
            .modifier("_auto_top_", "TOP 5")
            .modifier("_auto_top_", "TOP 7");
        assert_eq!(query.modifiers.len(), 1);
        assert_eq!(query.modifier_sql("_auto_top_"), Some("TOP 7"));
        assert_eq!(query.modifier_sql("missing"), None);
    }

    #[test]
    fn test_map_expressions_visits_every_clause() {
        let query = SelectQuery::new()
            .select_column("a")
            .from("t")
            .join(
                JoinType::Left,
                "u",
                None,
                vec![Expression::literal("t.id = u.t_id")],
            )
            .and_where(Expression::literal("x"))
            .group_by(Expression::identifier("a"))
            .having(Expression::literal("COUNT(*) > 1"))
            .order_by_expression(Expression::identifier("a"));

        let mut visited = 0;
        let mapped = query.map_expressions(&mut |_| {
            visited += 1;
            Expression::literal("?")
        });
        assert_eq!(visited, 6);
        assert_eq!(mapped.conditions, vec![Expression::literal("?")]);
        assert_eq!(mapped.joins[0].conditions, vec![Expression::literal("?")]);
        assert_eq!(mapped.from[0].name, "t");
    }
}
