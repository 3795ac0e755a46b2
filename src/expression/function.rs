//! SQL function call nodes.

use crate::expression::expr::{Expression, SqlContext};
use crate::value::BindType;

/// A function call such as `COALESCE(a, b)`.
///
/// The conjunction joins the arguments; it is `,` for ordinary calls and an
/// infix operator when a dialect rewrites a function into an operator
/// expression. An empty name renders just the parenthesized arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    name: String,
    args: Vec<Expression>,
    conjunction: String,
    return_type: Option<BindType>,
}

impl FunctionExpression {
    /// Create a call with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_args(name, Vec::new())
    }

    pub fn with_args(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self {
            name: name.into(),
            args,
            conjunction: ",".to_string(),
            return_type: None,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: Expression) -> Self {
        self.args.push(arg);
        self
    }

    pub fn returning(mut self, return_type: BindType) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Expression] {
        &self.args
    }

    pub fn conjunction(&self) -> &str {
        &self.conjunction
    }

    pub fn return_type(&self) -> Option<BindType> {
        self.return_type
    }

    /// Copy of this call under a different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Copy of this call joining its arguments with `conjunction`
    pub fn with_conjunction(&self, conjunction: impl Into<String>) -> Self {
        Self {
            conjunction: conjunction.into(),
            ..self.clone()
        }
    }

    /// Copy of this call with `args` placed before the existing arguments
    pub fn with_prepended(&self, args: Vec<Expression>) -> Self {
        let mut all = args;
        all.extend(self.args.iter().cloned());
        self.with_replaced_args(all)
    }

    /// Copy of this call with `args` placed after the existing arguments
    pub fn with_appended(&self, args: Vec<Expression>) -> Self {
        let mut all = self.args.clone();
        all.extend(args);
        self.with_replaced_args(all)
    }

    /// Copy of this call with a new argument list
    pub fn with_replaced_args(&self, args: Vec<Expression>) -> Self {
        Self {
            name: self.name.clone(),
            args,
            conjunction: self.conjunction.clone(),
            return_type: self.return_type,
        }
    }

    pub fn sql(&self, ctx: &mut SqlContext<'_>) -> String {
        let parts: Vec<String> = self
            .args
            .iter()
            .map(|arg| match arg {
                Expression::Subquery(_) => arg.sql_grouped(ctx),
                Expression::Conjunction { .. } => arg.sql_grouped(ctx),
                _ => arg.sql(ctx),
            })
            .collect();
        let separator = if self.conjunction == "," {
            ", ".to_string()
        } else {
            format!(" {} ", self.conjunction)
        };
        format!("{}({})", self.name, parts.join(&separator))
    }
}

impl From<&str> for FunctionExpression {
    fn from(name: &str) -> Self {
        FunctionExpression::new(name)
    }
}
