//! sqlhelm - SQL dialect and fixture tool

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use log::info;
use sqlhelm::dialect::DialectKind;
use sqlhelm::driver::{all_drivers, driver_for, DriverConfig, Extensions, EXTENSIONS_ENV};
use sqlhelm::expression::ValueBinder;
use sqlhelm::fixture::Fixture;
use std::path::{Path, PathBuf};

/// sqlhelm - engine-specific SQL generation
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which drivers have their client extension loaded
    Drivers,

    /// Print the SQL of a savepoint statement
    Savepoint {
        /// Target engine (sqlserver, sqlite)
        dialect: DialectKind,
        #[arg(value_enum)]
        action: SavepointAction,
        /// Savepoint name; not validated
        name: String,
    },

    /// Print the statements that set up a fixture table
    Fixture {
        /// Target engine (sqlserver, sqlite)
        dialect: DialectKind,
        /// Fixture TOML file
        file: PathBuf,
        /// Driver settings TOML file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SavepointAction {
    Save,
    Release,
    Rollback,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Drivers => list_drivers(),
        Command::Savepoint {
            dialect,
            action,
            name,
        } => {
            let dialect = dialect.dialect();
            let sql = match action {
                SavepointAction::Save => dialect.save_point_sql(&name),
                SavepointAction::Release => dialect.release_save_point_sql(&name),
                SavepointAction::Rollback => dialect.rollback_save_point_sql(&name),
            };
            println!("{}", sql);
            Ok(())
        }
        Command::Fixture {
            dialect,
            file,
            config,
        } => print_fixture(dialect, &file, config.as_deref()),
    }
}

fn list_drivers() -> Result<()> {
    let extensions = Extensions::from_env();
    info!("Probing drivers against {}", EXTENSIONS_ENV);
    for driver in all_drivers(&extensions) {
        let status = if driver.enabled() { "enabled" } else { "disabled" };
        println!("{:<10} {:<12} {}", driver.name(), driver.extension(), status);
    }
    Ok(())
}

fn print_fixture(kind: DialectKind, file: &Path, config: Option<&Path>) -> Result<()> {
    let fixture = Fixture::load(file)?;
    let settings = match config {
        Some(path) => DriverConfig::load(path)
            .with_context(|| format!("Failed to load driver config {}", path.display()))?,
        None => DriverConfig::new(),
    };

    let driver = driver_for(kind, Extensions::from_env());
    let effective = driver
        .config(&settings)
        .context("Invalid driver settings")?;
    if !driver.enabled() {
        info!("Driver {} is not enabled; printing SQL only", driver.name());
    }

    let schema = driver.dialect().schema_dialect();
    let mut binder = ValueBinder::new();
    let mut statements: Vec<String> = effective.init.clone().unwrap_or_default();
    statements.extend(fixture.drop_sql(schema.as_ref()));
    statements.extend(
        fixture
            .create_sql(schema.as_ref())
            .context("Failed to build CREATE TABLE")?,
    );
    statements.extend(
        fixture
            .insert_statements(schema.as_ref(), &mut binder)
            .context("Failed to build INSERT")?,
    );

    for statement in &statements {
        println!("{};", statement);
    }
    for binding in binder.bindings() {
        let bind_type = binding.bind_type.map_or("", |t| t.as_str());
        println!(
            "-- {} = {} {}",
            binding.placeholder,
            binding.value.to_sql_literal(),
            bind_type
        );
    }
    Ok(())
}
