//! Identifier quoting.

/// Wraps identifiers in an engine's start / end delimiter characters.
///
/// Embedded delimiter characters are not escaped; identifiers are assumed
/// never to contain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierQuoter {
    start: char,
    end: char,
}

impl IdentifierQuoter {
    pub const fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> char {
        self.start
    }

    pub fn end(&self) -> char {
        self.end
    }

    fn wrap(&self, word: &str) -> String {
        format!("{}{}{}", self.start, word, self.end)
    }

    /// Quote an identifier.
    ///
    /// Handles plain words, dotted paths (`a.b`, `a.*`), `name AS alias`
    /// and single-argument calls such as `COUNT(id)`. Anything else is
    /// returned unchanged.
    pub fn quote(&self, identifier: &str) -> String {
        let identifier = identifier.trim();
        if identifier.is_empty() || identifier == "*" {
            return identifier.to_string();
        }
        if is_word(identifier) {
            return self.wrap(identifier);
        }
        if let Some((name, alias)) = split_alias(identifier) {
            if is_word(alias) {
                return format!("{} AS {}", self.quote(name), self.wrap(alias));
            }
        }
        if let Some(open) = identifier.find('(') {
            if identifier.ends_with(')') && is_word(&identifier[..open]) {
                let inner = &identifier[open + 1..identifier.len() - 1];
                return format!("{}({})", &identifier[..open], self.quote(inner));
            }
        }
        let segments: Vec<&str> = identifier.split('.').collect();
        if let Some((last, init)) = segments.split_last() {
            if !init.is_empty()
                && init.iter().all(|s| is_word(s))
                && (is_word(last) || *last == "*")
            {
                let mut quoted: Vec<String> = init.iter().map(|s| self.wrap(s)).collect();
                quoted.push(if *last == "*" {
                    "*".to_string()
                } else {
                    self.wrap(last)
                });
                return quoted.join(".");
            }
        }
        identifier.to_string()
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn split_alias(identifier: &str) -> Option<(&str, &str)> {
    let lower = identifier.to_ascii_lowercase();
    let pos = lower.find(" as ")?;
    Some((identifier[..pos].trim(), identifier[pos + 4..].trim()))
}
