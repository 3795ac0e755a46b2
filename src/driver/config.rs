//! Connection settings.
//!
//! Every field is optional so a partial settings file can be merged over a
//! driver's base defaults.

use crate::driver::error::DriverResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Driver connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    /// Never written back out
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub persistent: Option<bool>,
    #[serde(default)]
    pub encoding: Option<String>,
    /// Raw client attributes passed through to the connection
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
    /// Statements to run right after connecting
    #[serde(default)]
    pub init: Option<Vec<String>>,
    #[serde(default)]
    pub quote_identifiers: Option<bool>,
}

impl DriverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> DriverResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> DriverResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Overlay these settings on `base`; set values win, flags are merged
    pub fn merged_over(&self, base: &DriverConfig) -> DriverConfig {
        let mut flags = base.flags.clone();
        flags.extend(self.flags.clone());
        DriverConfig {
            host: self.host.clone().or_else(|| base.host.clone()),
            port: self.port.or(base.port),
            database: self.database.clone().or_else(|| base.database.clone()),
            login: self.login.clone().or_else(|| base.login.clone()),
            password: self.password.clone().or_else(|| base.password.clone()),
            persistent: self.persistent.or(base.persistent),
            encoding: self.encoding.clone().or_else(|| base.encoding.clone()),
            flags,
            init: self.init.clone().or_else(|| base.init.clone()),
            quote_identifiers: self.quote_identifiers.or(base.quote_identifiers),
        }
    }

    pub fn quotes_identifiers(&self) -> bool {
        self.quote_identifiers.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_over_prefers_settings() {
        let base = DriverConfig {
            host: Some("localhost".to_string()),
            port: Some(1433),
            database: Some("cake".to_string()),
            flags: BTreeMap::from([("timeout".to_string(), "30".to_string())]),
            ..DriverConfig::default()
        };
        let settings = DriverConfig {
            database: Some("app".to_string()),
            flags: BTreeMap::from([("encrypt".to_string(), "yes".to_string())]),
            ..DriverConfig::default()
        };
        let merged = settings.merged_over(&base);
        assert_eq!(merged.host.as_deref(), Some("localhost"));
        assert_eq!(merged.port, Some(1433));
        assert_eq!(merged.database.as_deref(), Some("app"));
        assert_eq!(merged.flags.len(), 2);
        assert!(!merged.quotes_identifiers());
    }

    #[test]
    fn test_from_toml_str() {
        let config = DriverConfig::from_toml_str(
            "host = \"db.local\"\nport = 1500\nquote_identifiers = true\ninit = [\"SET NOCOUNT ON\"]",
        )
        .unwrap();
        assert_eq!(config.host.as_deref(), Some("db.local"));
        assert_eq!(config.port, Some(1500));
        assert!(config.quotes_identifiers());
        assert_eq!(config.init, Some(vec!["SET NOCOUNT ON".to_string()]));

        assert!(DriverConfig::from_toml_str("port = \"not a number\"").is_err());
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = DriverConfig {
            login: Some("sa".to_string()),
            password: Some("secret".to_string()),
            ..DriverConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("sa"));
        assert!(!text.contains("secret"));
    }
}
