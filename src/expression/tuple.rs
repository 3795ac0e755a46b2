//! Multi-column comparisons such as `(a, b) IN ((1, 2), (3, 4))`.

use crate::expression::expr::SqlContext;
use crate::query::SelectQuery;
use crate::value::{BindType, Value};

/// Right-hand side of a tuple comparison
#[derive(Debug, Clone, PartialEq)]
pub enum TupleValue {
    /// A select returning one column per compared field
    Subquery(Box<SelectQuery>),
    /// Literal rows, each with one value per compared field
    Tuples(Vec<Vec<Value>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleComparison {
    fields: Vec<String>,
    value: TupleValue,
    operator: String,
    types: Vec<Option<BindType>>,
}

impl TupleComparison {
    pub fn new(fields: Vec<String>, value: TupleValue, operator: &str) -> Self {
        let types = vec![None; fields.len()];
        Self {
            fields,
            value,
            operator: operator.to_string(),
            types,
        }
    }

    /// `(fields) IN (query)`
    pub fn in_query(fields: Vec<String>, query: SelectQuery) -> Self {
        Self::new(fields, TupleValue::Subquery(Box::new(query)), "IN")
    }

    /// `(fields) IN ((..), (..))`
    pub fn in_tuples(fields: Vec<String>, tuples: Vec<Vec<Value>>) -> Self {
        Self::new(fields, TupleValue::Tuples(tuples), "IN")
    }

    /// Bind types positionally matching the fields
    pub fn with_types(mut self, types: Vec<Option<BindType>>) -> Self {
        self.types = types;
        self.types.resize(self.fields.len(), None);
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn value(&self) -> &TupleValue {
        &self.value
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn types(&self) -> &[Option<BindType>] {
        &self.types
    }

    /// Copy of this comparison against a different value
    pub fn with_value(&self, value: TupleValue) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    /// Placeholders consumed by literal rows
    pub fn count(&self) -> usize {
        match &self.value {
            TupleValue::Subquery(_) => 0,
            TupleValue::Tuples(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    /// True for operators satisfied when no row matches
    pub fn is_negated(&self) -> bool {
        let op = self.operator.to_ascii_uppercase();
        op == "NOT IN" || op == "!=" || op == "<>"
    }

    /// Constant predicate standing in for a comparison against zero rows
    pub fn empty_list_sql(&self) -> &'static str {
        if self.is_negated() {
            "1 = 1"
        } else {
            "1 = 0"
        }
    }

    fn is_list_operator(&self) -> bool {
        let op = self.operator.to_ascii_uppercase();
        op == "IN" || op == "NOT IN"
    }

    fn row_sql(&self, row: &[Value], ctx: &mut SqlContext<'_>) -> String {
        let values: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let bind_type = self.types.get(i).copied().flatten();
                ctx.binder.bind_value(v, bind_type)
            })
            .collect();
        format!("({})", values.join(", "))
    }

    pub fn sql(&self, ctx: &mut SqlContext<'_>) -> String {
        let fields: Vec<String> = self.fields.iter().map(|f| ctx.compiler.quote(f)).collect();
        let value = match &self.value {
            TupleValue::Subquery(query) => format!("({})", ctx.subquery(query)),
            TupleValue::Tuples(rows) if rows.is_empty() => {
                return self.empty_list_sql().to_string();
            }
            TupleValue::Tuples(rows) if rows.len() == 1 && !self.is_list_operator() => {
                self.row_sql(&rows[0], ctx)
            }
            TupleValue::Tuples(rows) => {
                let rendered: Vec<String> = rows.iter().map(|r| self.row_sql(r, ctx)).collect();
                format!("({})", rendered.join(", "))
            }
        };
        format!("({}) {} {}", fields.join(", "), self.operator, value)
    }
}
