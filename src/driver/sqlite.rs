//! SQLite driver.

use crate::dialect::{Dialect, SqliteDialect};
use crate::driver::{Driver, DriverConfig, Extensions};

/// Extension providing the SQLite client
pub const SQLITE_EXTENSION: &str = "pdo_sqlite";

#[derive(Debug, Clone, Default)]
pub struct SqliteDriver {
    extensions: Extensions,
}

impl SqliteDriver {
    pub fn new(extensions: Extensions) -> Self {
        Self { extensions }
    }

    pub fn from_env() -> Self {
        Self::new(Extensions::from_env())
    }
}

impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn extension(&self) -> &'static str {
        SQLITE_EXTENSION
    }

    fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    fn base_config(&self) -> DriverConfig {
        DriverConfig {
            database: Some(":memory:".to_string()),
            persistent: Some(false),
            encoding: Some("utf8".to_string()),
            init: Some(Vec::new()),
            ..DriverConfig::default()
        }
    }

    fn dialect(&self) -> Box<dyn Dialect> {
        Box::new(SqliteDialect)
    }
}
