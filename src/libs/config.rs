//! Configuration management for taskscope.
//!
//! Settings live in a JSON file in the per-user data directory. Every section
//! is optional and a missing file means "all defaults", so the tool works
//! without any setup.
//!
//! ## Configuration Structure
//!
//! - **Database**: override the location of the SQLite file
//! - **Query**: how the command line interprets due-date keywords
//!
//! ```json
//! {
//!   "database": { "path": "/srv/taskscope/tasks.db" },
//!   "query": { "strict_due_filter": true }
//! }
//! ```
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use taskscope::libs::config::Config;
//!
//! let mut config = Config::read()?;
//! config.query.strict_due_filter = true;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use super::messages::Message;
use super::scope::DueFilter;
use crate::msg_error_anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default database file name inside the data directory.
pub const DB_FILE_NAME: &str = "taskscope.db";

/// Location of the task database.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// Absolute path of the SQLite file. Relative paths are resolved against
    /// the working directory of the process.
    pub path: PathBuf,
}

/// Query interpretation settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct QueryConfig {
    /// Reject unknown due-date keywords instead of ignoring them.
    ///
    /// Off by default: an unrecognized keyword such as `tomorrow` applies no
    /// due-date constraint at all. Turning this on makes a typo fail loudly
    /// rather than silently returning unfiltered results.
    #[serde(default)]
    pub strict_due_filter: bool,
}

/// Main configuration container for the entire application.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub query: QueryConfig,
}

impl Config {
    /// Reads the configuration from the data directory, or returns the
    /// defaults when no file exists yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(Message::ConfigParseError(e.to_string())))
    }

    /// Writes the configuration to the data directory and returns the path
    /// it was written to.
    pub fn save(&self) -> Result<PathBuf> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)?;
        Ok(config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Applies the options given to `init`. Options left as `None` keep
    /// their current value.
    pub fn update(&mut self, database_path: Option<PathBuf>, strict_due_filter: Option<bool>) {
        if let Some(path) = database_path {
            self.database = Some(DatabaseConfig { path });
        }
        if let Some(strict) = strict_due_filter {
            self.query.strict_due_filter = strict;
        }
    }

    /// Resolved location of the SQLite database.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(database) => Ok(database.path.clone()),
            None => Ok(DataStorage::new().get_path(DB_FILE_NAME)?),
        }
    }

    /// Interprets a due-date keyword according to `query.strict_due_filter`.
    pub fn due_filter(&self, keyword: Option<&str>) -> Result<DueFilter> {
        if !self.query.strict_due_filter {
            return Ok(DueFilter::lenient(keyword));
        }

        match keyword {
            Some(keyword) => Ok(keyword.parse::<DueFilter>()?),
            None => Ok(DueFilter::None),
        }
    }
}
