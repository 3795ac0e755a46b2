//! SQL Server driver.

use crate::dialect::{Dialect, SqlServerDialect};
use crate::driver::{Driver, DriverConfig, Extensions};

/// Extension providing the SQL Server client
pub const SQLSRV_EXTENSION: &str = "pdo_sqlsrv";

#[derive(Debug, Clone, Default)]
pub struct SqlServerDriver {
    extensions: Extensions,
}

impl SqlServerDriver {
    pub fn new(extensions: Extensions) -> Self {
        Self { extensions }
    }

    /// Driver probing the extensions named in `SQLHELM_EXTENSIONS`
    pub fn from_env() -> Self {
        Self::new(Extensions::from_env())
    }
}

impl Driver for SqlServerDriver {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn extension(&self) -> &'static str {
        SQLSRV_EXTENSION
    }

    fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    fn base_config(&self) -> DriverConfig {
        DriverConfig {
            host: Some("localhost".to_string()),
            port: Some(1433),
            database: Some("cake".to_string()),
            login: Some(String::new()),
            password: Some(String::new()),
            persistent: Some(false),
            encoding: Some("utf8".to_string()),
            init: Some(Vec::new()),
            ..DriverConfig::default()
        }
    }

    fn dialect(&self) -> Box<dyn Dialect> {
        Box::new(SqlServerDialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_merges_over_defaults() {
        let driver = SqlServerDriver::default();
        let settings = DriverConfig {
            host: Some("db.internal".to_string()),
            login: Some("sa".to_string()),
            ..DriverConfig::default()
        };
        let config = driver.config(&settings).unwrap();
        assert_eq!(config.host.as_deref(), Some("db.internal"));
        assert_eq!(config.login.as_deref(), Some("sa"));
        assert_eq!(config.port, Some(1433));
        assert_eq!(config.database.as_deref(), Some("cake"));
        assert_eq!(config.encoding.as_deref(), Some("utf8"));
        assert_eq!(config.persistent, Some(false));
    }

    #[test]
    fn test_enabled() {
        assert!(!SqlServerDriver::new(Extensions::default()).enabled());
        assert!(SqlServerDriver::new(Extensions::parse("pdo_sqlsrv")).enabled());
        assert!(SqlServerDriver::new(Extensions::new(["PDO_SQLSRV"])).enabled());
        assert_eq!(SqlServerDriver::default().dialect().name(), "sqlserver");
    }
}
