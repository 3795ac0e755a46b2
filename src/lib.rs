pub mod compiler;
pub mod dialect;
pub mod driver;
pub mod expression;
pub mod fixture;
pub mod form;
pub mod query;
pub mod schema;
pub mod value;
