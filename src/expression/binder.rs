//! Placeholder allocation for bound values.

use crate::value::{BindType, Value};

/// A value bound to a named placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub placeholder: String,
    pub value: Value,
    pub bind_type: Option<BindType>,
}

/// Collects the values bound while an expression tree is rendered.
///
/// In inline mode no placeholders are allocated and values are rendered
/// as SQL literals instead.
#[derive(Debug, Default)]
pub struct ValueBinder {
    bindings: Vec<Binding>,
    counter: usize,
    inline: bool,
}

impl ValueBinder {
    /// Create a binder that allocates `:c0`, `:c1`, ... placeholders
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a binder that renders values inline
    pub fn inline() -> Self {
        Self {
            inline: true,
            ..Self::default()
        }
    }

    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// Allocate a fresh placeholder name with the given prefix
    pub fn placeholder(&mut self, token: &str) -> String {
        let name = format!(":{}{}", token, self.counter);
        self.counter += 1;
        name
    }

    /// Bind a value and return the SQL text standing in for it
    pub fn bind_value(&mut self, value: &Value, bind_type: Option<BindType>) -> String {
        if self.inline {
            return value.to_sql_literal();
        }
        let placeholder = self.placeholder("c");
        self.bindings.push(Binding {
            placeholder: placeholder.clone(),
            value: value.clone(),
            bind_type,
        });
        placeholder
    }

    /// Bindings in allocation order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Look up the binding for a placeholder
    pub fn get(&self, placeholder: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.placeholder == placeholder)
    }

    /// Forget all bindings and restart numbering
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.counter = 0;
    }
}
