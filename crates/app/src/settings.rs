//! Handles settings for the application.
//!
//! Sources, lowest priority first: `config/tallybook.toml` (or the file given
//! with `--config`), `TALLYBOOK__*` environment variables, command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use store::Currency;

use crate::cli::Cli;

const DEFAULT_CONFIG_PATH: &str = "config/tallybook";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

impl From<&str> for Database {
    fn from(value: &str) -> Self {
        match value.trim() {
            "memory" | ":memory:" => Database::Memory,
            path => Database::Sqlite(path.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: Database,
    /// CSV register used by the `book` commands.
    pub plots_file: PathBuf,
    pub log_level: String,
    /// Used when a refueling is entered without a currency.
    pub default_currency: Currency,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: Database::Sqlite("tallybook.db".to_string()),
            plots_file: PathBuf::from("plots.csv"),
            log_level: "info".to_string(),
            default_currency: Currency::Eur,
        }
    }
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let config_path = cli
            .config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::from(config_path).required(cli.config.is_some()))
            .add_source(config::Environment::with_prefix("TALLYBOOK").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(database) = cli.database.as_deref() {
            settings.database = Database::from(database);
        }
        if let Some(plots_file) = &cli.plots_file {
            settings.plots_file = plots_file.clone();
        }
        if let Some(level) = &cli.log_level {
            settings.log_level = level.clone();
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_flag_understands_memory() {
        assert_eq!(Database::from("memory"), Database::Memory);
        assert_eq!(
            Database::from("data/book.db"),
            Database::Sqlite("data/book.db".to_string())
        );
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
        assert_eq!(
            Database::from("book.db").url(),
            "sqlite:book.db?mode=rwc"
        );
    }

    #[test]
    fn table_file_is_parsed() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                "log_level = \"debug\"\ndefault_currency = \"PLN\"\n[database]\nsqlite = \"fleet.db\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.database, Database::Sqlite("fleet.db".to_string()));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.default_currency, Currency::Pln);
        assert_eq!(settings.plots_file, PathBuf::from("plots.csv"));
    }
}
