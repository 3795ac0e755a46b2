//! Word inflections used for labels and DOM ids.

/// `first_name` -> `FirstName`
pub fn camelize(word: &str) -> String {
    word.split(|c| c == '_' || c == ' ')
        .filter(|part| !part.is_empty())
        .map(upper_first)
        .collect()
}

/// `FirstName` -> `first_name`
pub fn underscore(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    for (i, c) in word.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `first_name` -> `First Name`
pub fn humanize(word: &str) -> String {
    word.split('_')
        .filter(|part| !part.is_empty())
        .map(upper_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace every run of characters outside `[A-Za-z0-9]` with `_`
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_gap = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_gap = false;
        } else if !in_gap {
            out.push('_');
            in_gap = true;
        }
    }
    out
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("first_name"), "FirstName");
        assert_eq!(camelize("Post"), "Post");
        assert_eq!(camelize("0"), "0");
    }

    #[test]
    fn test_underscore_and_humanize() {
        assert_eq!(underscore("FirstName"), "first_name");
        assert_eq!(underscore("title"), "title");
        assert_eq!(humanize("first_name"), "First Name");
        assert_eq!(humanize(&underscore("createdAt")), "Created At");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("a b--c"), "a_b_c");
        assert_eq!(slug("12"), "12");
    }
}
