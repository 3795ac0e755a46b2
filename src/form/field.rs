//! Dotted field paths (`Model.field`, `Model.tags.0`).

use crate::form::inflector::camelize;

/// A field path split into segments, model first when known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    parts: Vec<String>,
}

fn is_model_segment(segment: &str) -> bool {
    segment
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_uppercase() || c == '_')
}

impl FieldPath {
    /// Parse `name`, prefixing `default_model` when the first segment does
    /// not name a model
    pub fn parse(name: &str, default_model: Option<&str>) -> Self {
        let mut parts: Vec<String> = name
            .split('.')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        if let (Some(first), Some(model)) = (parts.first(), default_model) {
            if !is_model_segment(first) {
                parts.insert(0, model.to_string());
            }
        }
        Self { parts }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Leading model segment, if any
    pub fn model(&self) -> Option<&str> {
        self.parts
            .first()
            .filter(|first| is_model_segment(first))
            .map(String::as_str)
    }

    /// Last non-numeric segment
    pub fn field(&self) -> &str {
        self.parts
            .iter()
            .rev()
            .find(|part| !part.chars().all(|c| c.is_ascii_digit()))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn child(&self, segment: &str) -> Self {
        let mut parts = self.parts.clone();
        parts.push(segment.to_string());
        Self { parts }
    }

    pub fn dotted(&self) -> String {
        self.parts.join(".")
    }

    /// `data[Model][field]`
    pub fn input_name(&self) -> String {
        let segments: String = self.parts.iter().map(|p| format!("[{}]", p)).collect();
        format!("data{}", segments)
    }

    /// `ModelField`
    pub fn dom_id(&self) -> String {
        self.parts.iter().map(|p| camelize(p)).collect()
    }
}
