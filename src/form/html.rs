//! HTML tag rendering.

/// Attribute names rendered in minimized form (`checked="checked"`)
const MINIMIZED: &[&str] = &[
    "autofocus", "checked", "disabled", "multiple", "readonly", "required", "selected",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    /// `true` renders minimized, `false` drops the attribute
    Flag(bool),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Flag(value)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Text(value.to_string())
    }
}

/// Ordered HTML attributes; setting an existing key keeps its position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Set `key` only when absent
    pub fn set_default(&mut self, key: &str, value: impl Into<AttrValue>) {
        if !self.contains(key) {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(AttrValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Append `class` to the space separated class list
    pub fn add_class(&mut self, class: &str) {
        let merged = match self.text("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set("class", merged);
    }

    /// Overlay `other`; its values win
    pub fn merge(&mut self, other: &Attributes) {
        for (key, value) in &other.entries {
            self.set(key, value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as ` key="value"` pairs, escaping values
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            match value {
                AttrValue::Flag(false) => {}
                AttrValue::Flag(true) => out.push_str(&format!(" {}=\"{}\"", key, key)),
                AttrValue::Text(text) if MINIMIZED.contains(&key.as_str()) => {
                    if text == "1" || text == "true" || text == key {
                        out.push_str(&format!(" {}=\"{}\"", key, key));
                    }
                }
                AttrValue::Text(text) => {
                    out.push_str(&format!(" {}=\"{}\"", key, escape(text)));
                }
            }
        }
        out
    }
}

/// Escape text for HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<name attrs>content</name>`
pub fn tag(name: &str, content: &str, attributes: &Attributes) -> String {
    format!("<{}{}>{}</{}>", name, attributes.render(), content, name)
}

/// `<name attrs/>`
pub fn void_tag(name: &str, attributes: &Attributes) -> String {
    format!("<{}{}/>", name, attributes.render())
}

/// Hidden wrapper used for `_method`, CSRF and token fields
pub fn hidden_block(content: &str) -> String {
    format!("<div style=\"display:none;\">{}</div>", content)
}

/// `<ul><li>..</li></ul>`
pub fn nested_list(items: &[String]) -> String {
    let items: String = items.iter().map(|item| format!("<li>{}</li>", item)).collect();
    format!("<ul>{}</ul>", items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_attributes() {
        let attrs = Attributes::new()
            .with("name", "data[Post][title]")
            .with("value", "a \"quoted\" <b>")
            .with("disabled", true)
            .with("checked", false)
            .with("selected", "selected");
        assert_eq!(
            attrs.render(),
            " name=\"data[Post][title]\" value=\"a &quot;quoted&quot; &lt;b&gt;\" \
             disabled=\"disabled\" selected=\"selected\""
        );
    }

    #[test]
    fn test_set_keeps_position_and_add_class() {
        let mut attrs = Attributes::new().with("id", "A").with("class", "input");
        attrs.set("id", "B");
        attrs.add_class("text");
        assert_eq!(attrs.render(), " id=\"B\" class=\"input text\"");
        assert_eq!(attrs.remove("id"), Some(AttrValue::Text("B".to_string())));
        assert!(!attrs.contains("id"));
    }

    #[test]
    fn test_tags() {
        let attrs = Attributes::new().with("class", "input");
        assert_eq!(tag("div", "x", &attrs), "<div class=\"input\">x</div>");
        assert_eq!(void_tag("input", &Attributes::new()), "<input/>");
        assert_eq!(escape("it's & done"), "it&#039;s &amp; done");
        assert_eq!(
            nested_list(&["a".to_string(), "b".to_string()]),
            "<ul><li>a</li><li>b</li></ul>"
        );
    }
}
