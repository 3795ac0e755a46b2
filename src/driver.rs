//! Database drivers: capability descriptors for one engine each.
//!
//! A driver never connects. It validates connection settings against its
//! base defaults, reports whether the client library is available, and
//! hands out the engine's dialect and compiler.

pub mod config;
pub mod error;
pub mod extensions;
pub mod sqlite;
pub mod sqlserver;

pub use config::DriverConfig;
pub use error::{DriverError, DriverResult};
pub use extensions::{Extensions, EXTENSIONS_ENV};
pub use sqlite::SqliteDriver;
pub use sqlserver::SqlServerDriver;

use crate::compiler::QueryCompiler;
use crate::dialect::{Dialect, DialectKind};
use crate::expression::ValueBinder;
use crate::query::SelectQuery;
use log::debug;
use std::fmt;

pub trait Driver: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Client extension that must be loaded for this driver
    fn extension(&self) -> &'static str;

    fn extensions(&self) -> &Extensions;

    /// Defaults that caller settings are merged over
    fn base_config(&self) -> DriverConfig;

    /// Merge `settings` over the base defaults and validate the result
    fn config(&self, settings: &DriverConfig) -> DriverResult<DriverConfig> {
        let merged = settings.merged_over(&self.base_config());
        if merged.port == Some(0) {
            return Err(DriverError::InvalidSetting {
                key: "port",
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        if merged.database.as_deref().map_or(true, str::is_empty) {
            return Err(DriverError::InvalidSetting {
                key: "database",
                reason: "must not be empty".to_string(),
            });
        }
        if merged.encoding.as_deref() == Some("") {
            return Err(DriverError::InvalidSetting {
                key: "encoding",
                reason: "must not be empty".to_string(),
            });
        }
        debug!("{}: effective config for database {:?}", self.name(), merged.database);
        Ok(merged)
    }

    /// True when the client library is available; never fails
    fn enabled(&self) -> bool {
        self.extensions().contains(self.extension())
    }

    fn dialect(&self) -> Box<dyn Dialect>;

    /// The dialect's compiler, quoting identifiers when configured to
    fn compiler(&self, config: &DriverConfig) -> QueryCompiler {
        self.dialect()
            .new_compiler()
            .with_quoting(config.quotes_identifiers())
    }

    fn compile(
        &self,
        config: &DriverConfig,
        query: &SelectQuery,
        binder: &mut ValueBinder,
    ) -> String {
        self.dialect()
            .compile_with(&self.compiler(config), query, binder)
    }
}

/// Driver for a dialect kind
pub fn driver_for(kind: DialectKind, extensions: Extensions) -> Box<dyn Driver> {
    match kind {
        DialectKind::SqlServer => Box::new(SqlServerDriver::new(extensions)),
        DialectKind::Sqlite => Box::new(SqliteDriver::new(extensions)),
    }
}

/// Every built-in driver, in a fixed order
pub fn all_drivers(extensions: &Extensions) -> Vec<Box<dyn Driver>> {
    [DialectKind::SqlServer, DialectKind::Sqlite]
        .into_iter()
        .map(|kind| driver_for(kind, extensions.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Comparison;

    #[test]
    fn test_enabled_follows_extensions() {
        let extensions = Extensions::parse("pdo_sqlite");
        let enabled: Vec<(&str, bool)> = all_drivers(&extensions)
            .iter()
            .map(|d| (d.name(), d.enabled()))
            .collect();
        assert_eq!(enabled, vec![("sqlserver", false), ("sqlite", true)]);
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let driver = SqlServerDriver::new(Extensions::default());
        let settings = DriverConfig {
            port: Some(0),
            ..DriverConfig::default()
        };
        assert!(matches!(
            driver.config(&settings),
            Err(DriverError::InvalidSetting { key: "port", .. })
        ));
    }

    #[test]
    fn test_compile_honors_quoting() {
        let driver = SqlServerDriver::new(Extensions::default());
        let query = SelectQuery::new()
            .select_column("title")
            .from("articles")
            .and_where(Comparison::eq("id", 1))
            .limit(1);

        let plain = driver.compile(&DriverConfig::default(), &query, &mut ValueBinder::new());
        assert_eq!(plain, "SELECT TOP 1 title FROM articles WHERE id = :c0");

        let quoted_config = DriverConfig {
            quote_identifiers: Some(true),
            ..DriverConfig::default()
        };
        let quoted = driver.compile(&quoted_config, &query, &mut ValueBinder::new());
        assert_eq!(quoted, "SELECT TOP 1 [title] FROM [articles] WHERE [id] = :c0");
    }
}
