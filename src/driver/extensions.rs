//! Client library availability.

use std::collections::BTreeSet;

/// Environment variable listing the loaded client extensions
pub const EXTENSIONS_ENV: &str = "SQLHELM_EXTENSIONS";

/// Set of client extensions available to the running process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensions {
    names: BTreeSet<String>,
}

impl Extensions {
    /// Names are matched case-insensitively
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .map(|name| Into::<String>::into(name).to_ascii_lowercase())
                .collect(),
        }
    }

    /// Parse a comma separated list, ignoring blanks and case
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    /// Read the extension list from `SQLHELM_EXTENSIONS`; unset means none
    pub fn from_env() -> Self {
        Self::parse(&std::env::var(EXTENSIONS_ENV).unwrap_or_default())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let extensions = Extensions::parse(" pdo_sqlsrv, PDO_SQLITE ,,");
        assert!(extensions.contains("pdo_sqlsrv"));
        assert!(extensions.contains("pdo_sqlite"));
        assert!(!extensions.contains("pdo_mysql"));
        assert_eq!(extensions.iter().count(), 2);
    }

    #[test]
    fn test_new_ignores_case() {
        let extensions = Extensions::new(["PDO_SQLSRV"]);
        assert!(extensions.contains("pdo_sqlsrv"));
        assert_eq!(extensions.iter().collect::<Vec<_>>(), ["pdo_sqlsrv"]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(Extensions::parse(""), Extensions::default());
        assert!(!Extensions::default().contains("pdo_sqlite"));
    }
}
