//! SQL expression nodes.
//!
//! This module provides:
//! - The expression tree (`Expression`) and its node kinds
//! - Comparison, function call and tuple comparison nodes
//! - The value binder that allocates placeholders while rendering

pub mod binder;
pub mod comparison;
pub mod expr;
pub mod function;
pub mod tuple;

pub use binder::{Binding, ValueBinder};
pub use comparison::{Comparison, ComparisonValue};
pub use expr::{Conjunction, Expression, ExpressionKind, SqlContext};
pub use function::FunctionExpression;
pub use tuple::{TupleComparison, TupleValue};
