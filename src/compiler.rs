//! Query compiler: serializes a translated `SelectQuery` to SQL text.

use crate::dialect::IdentifierQuoter;
use crate::expression::{Expression, SqlContext, ValueBinder};
use crate::query::{Join, SelectQuery, TableReference};
use log::trace;

/// How an engine spells row paging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStyle {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH FIRST n ROWS ONLY`; a limit alone is expected to
    /// have been turned into a `TOP n` modifier by the dialect
    OffsetFetch,
}

/// Serializes queries for a single engine
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    paging: PagingStyle,
    quoter: IdentifierQuoter,
    quote_identifiers: bool,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(PagingStyle::LimitOffset, IdentifierQuoter::new('"', '"'))
    }
}

impl QueryCompiler {
    pub fn new(paging: PagingStyle, quoter: IdentifierQuoter) -> Self {
        Self {
            paging,
            quoter,
            quote_identifiers: false,
        }
    }

    /// Enable or disable automatic identifier quoting
    pub fn with_quoting(mut self, enabled: bool) -> Self {
        self.quote_identifiers = enabled;
        self
    }

    pub fn paging(&self) -> PagingStyle {
        self.paging
    }

    pub fn quotes_identifiers(&self) -> bool {
        self.quote_identifiers
    }

    /// Quote an identifier if quoting is enabled
    pub fn quote(&self, identifier: &str) -> String {
        if self.quote_identifiers {
            self.quoter.quote(identifier)
        } else {
            identifier.to_string()
        }
    }

    /// Render a single expression
    pub fn compile_expression(&self, expression: &Expression, binder: &mut ValueBinder) -> String {
        let mut ctx = SqlContext::new(binder, self);
        expression.sql(&mut ctx)
    }

    /// Render a full select statement
    pub fn compile_select(&self, query: &SelectQuery, binder: &mut ValueBinder) -> String {
        let mut ctx = SqlContext::new(binder, self);
        let mut sql = self.select_part(query, &mut ctx);
        sql.push_str(&self.from_part(&query.from));
        sql.push_str(&self.join_part(&query.joins, &mut ctx));
        sql.push_str(&self.conditions_part(" WHERE ", &query.conditions, &mut ctx));
        if !query.group_by.is_empty() {
            let groups: Vec<String> = query.group_by.iter().map(|g| g.sql(&mut ctx)).collect();
            sql.push_str(&format!(" GROUP BY {}", groups.join(", ")));
        }
        sql.push_str(&self.conditions_part(" HAVING ", &query.having, &mut ctx));
        sql.push_str(&self.order_part(query, &mut ctx));
        sql.push_str(&self.paging_part(query));
        trace!("Compiled select: {}", sql);
        sql
    }

    fn select_part(&self, query: &SelectQuery, ctx: &mut SqlContext<'_>) -> String {
        let mut words = vec!["SELECT".to_string()];
        if query.distinct {
            words.push("DISTINCT".to_string());
        }
        words.extend(query.modifiers.iter().map(|(_, sql)| sql.clone()));

        let fields: Vec<String> = query
            .select
            .iter()
            .map(|item| {
                let expr = item.expression.sql_grouped(ctx);
                match &item.alias {
                    Some(alias) => format!("{} AS {}", expr, self.quote(alias)),
                    None => expr,
                }
            })
            .collect();
        if fields.is_empty() {
            words.push("*".to_string());
        } else {
            words.push(fields.join(", "));
        }
        words.join(" ")
    }

    fn table_sql(&self, table: &TableReference) -> String {
        match &table.alias {
            Some(alias) => format!("{} {}", self.quote(&table.name), self.quote(alias)),
            None => self.quote(&table.name),
        }
    }

    fn from_part(&self, from: &[TableReference]) -> String {
        if from.is_empty() {
            return String::new();
        }
        let tables: Vec<String> = from.iter().map(|t| self.table_sql(t)).collect();
        format!(" FROM {}", tables.join(", "))
    }

    fn join_part(&self, joins: &[Join], ctx: &mut SqlContext<'_>) -> String {
        let mut sql = String::new();
        for join in joins {
            sql.push_str(&format!(
                " {} {}",
                join.join_type.as_str(),
                self.table_sql(&join.table)
            ));
            if join.conditions.is_empty() {
                sql.push_str(" ON 1 = 1");
            } else {
                sql.push_str(&self.conditions_part(" ON ", &join.conditions, ctx));
            }
        }
        sql
    }

    fn conditions_part(
        &self,
        keyword: &str,
        conditions: &[Expression],
        ctx: &mut SqlContext<'_>,
    ) -> String {
        if conditions.is_empty() {
            return String::new();
        }
        let combined = if conditions.len() == 1 {
            conditions[0].sql(ctx)
        } else {
            Expression::and(conditions.to_vec()).sql(ctx)
        };
        if combined.is_empty() {
            return String::new();
        }
        format!("{}{}", keyword, combined)
    }

    fn order_part(&self, query: &SelectQuery, ctx: &mut SqlContext<'_>) -> String {
        if query.order_by.is_empty() {
            return String::new();
        }
        let items: Vec<String> = query
            .order_by
            .iter()
            .map(|item| {
                let expr = item.expression.sql(ctx);
                match item.direction {
                    Some(direction) => format!("{} {}", expr, direction.as_str()),
                    None => expr,
                }
            })
            .collect();
        format!(" ORDER BY {}", items.join(", "))
    }

    fn paging_part(&self, query: &SelectQuery) -> String {
        match self.paging {
            PagingStyle::LimitOffset => match (query.limit, query.offset) {
                (Some(limit), Some(offset)) => format!(" LIMIT {} OFFSET {}", limit, offset),
                (Some(limit), None) => format!(" LIMIT {}", limit),
                (None, Some(offset)) => format!(" LIMIT -1 OFFSET {}", offset),
                (None, None) => String::new(),
            },
            PagingStyle::OffsetFetch => match (query.limit, query.offset) {
                (Some(limit), Some(offset)) => {
                    format!(" OFFSET {} ROWS FETCH FIRST {} ROWS ONLY", offset, limit)
                }
                (None, Some(offset)) => format!(" OFFSET {} ROWS", offset),
                (Some(_), None) | (None, None) => String::new(),
            },
        }
    }
}
