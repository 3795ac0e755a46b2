//! Declarative function translation rules.
//!
//! Each dialect maps canonical function names to one of these rules; the
//! rule builds the engine-specific replacement node.

use crate::expression::{Expression, FunctionExpression};

/// How a generic function call is rewritten for an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionTranslation {
    /// `NOW()` → `GETUTCDATE()`
    Rename(&'static str),
    /// `CONCAT(a, b)` → `(a + b)`
    Infix(&'static str),
    /// `DATEDIFF(a, b)` → `DATEDIFF(day, a, b)`
    PrependLiteral(&'static str),
    /// `CURRENT_DATE()` → `CONVERT(date, GETUTCDATE())`
    Convert {
        target: &'static str,
        now: &'static str,
    },
    /// `NOW()` → `DATETIME('now')`
    RenameWithLiteral {
        name: &'static str,
        literal: &'static str,
    },
    /// `DATEDIFF(a, b)` → `ROUND(JULIANDAY(a) - JULIANDAY(b))`
    WrapEach {
        name: &'static str,
        conjunction: &'static str,
        wrapper: &'static str,
    },
}

impl FunctionTranslation {
    /// Build the replacement node; `function` is left untouched
    pub fn apply(&self, function: &FunctionExpression) -> Expression {
        let translated = match *self {
            FunctionTranslation::Rename(name) => function.renamed(name),
            FunctionTranslation::Infix(operator) => {
                function.renamed("").with_conjunction(operator)
            }
            FunctionTranslation::PrependLiteral(literal) => {
                function.with_prepended(vec![Expression::literal(literal)])
            }
            FunctionTranslation::Convert { target, now } => {
                function.renamed("CONVERT").with_appended(vec![
                    Expression::literal(target),
                    Expression::Function(FunctionExpression::new(now)),
                ])
            }
            FunctionTranslation::RenameWithLiteral { name, literal } => function
                .renamed(name)
                .with_appended(vec![Expression::literal(literal)]),
            FunctionTranslation::WrapEach {
                name,
                conjunction,
                wrapper,
            } => {
                let wrapped = function
                    .args()
                    .iter()
                    .map(|arg| {
                        Expression::Function(FunctionExpression::with_args(
                            wrapper,
                            vec![arg.clone()],
                        ))
                    })
                    .collect();
                function
                    .renamed(name)
                    .with_conjunction(conjunction)
                    .with_replaced_args(wrapped)
            }
        };
        Expression::Function(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ValueBinder;

    fn render(expr: &Expression) -> String {
        expr.to_sql(&mut ValueBinder::new())
    }

    fn two_args(name: &str) -> FunctionExpression {
        FunctionExpression::with_args(
            name,
            vec![Expression::identifier("a"), Expression::identifier("b")],
        )
    }

    #[test]
    fn test_rename() {
        let out = FunctionTranslation::Rename("GETUTCDATE").apply(&FunctionExpression::new("NOW"));
        assert_eq!(render(&out), "GETUTCDATE()");
    }

    #[test]
    fn test_infix() {
        let out = FunctionTranslation::Infix("||").apply(&two_args("CONCAT"));
        assert_eq!(render(&out), "(a || b)");
    }

    #[test]
    fn test_convert() {
        let out = FunctionTranslation::Convert {
            target: "time",
            now: "GETUTCDATE",
        }
        .apply(&FunctionExpression::new("CURRENT_TIME"));
        assert_eq!(render(&out), "CONVERT(time, GETUTCDATE())");
    }

    #[test]
    fn test_wrap_each() {
        let out = FunctionTranslation::WrapEach {
            name: "ROUND",
            conjunction: "-",
            wrapper: "JULIANDAY",
        }
        .apply(&two_args("DATEDIFF"));
        assert_eq!(render(&out), "ROUND(JULIANDAY(a) - JULIANDAY(b))");
    }

    #[test]
    fn test_rename_with_literal() {
        let out = FunctionTranslation::RenameWithLiteral {
            name: "DATE",
            literal: "'now'",
        }
        .apply(&FunctionExpression::new("CURRENT_DATE"));
        assert_eq!(render(&out), "DATE('now')");
    }
}
