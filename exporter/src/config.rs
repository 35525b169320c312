//! Startup configuration.
//!
//! Read once from the process environment (the binary loads `.env` first)
//! and validated before any export runs. Command line flags take precedence.

use std::env;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

pub const START_FOLDER_VAR: &str = "API_FILES_START_FOLDER";
pub const DATABASE_DIR_VAR: &str = "DATABASE_DIR";
pub const INDEX_HTML_VAR: &str = "INDEX_HTML_PATH";

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start_folder: Option<PathBuf>,
    pub database_dir: Option<PathBuf>,
    pub index_html: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the api-files tree.
    pub start_folder: PathBuf,
    /// Root of the workbook CSV exports.
    pub database_dir: PathBuf,
    /// Copied as `index.html` into new folders.
    pub index_html: Option<PathBuf>,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env(overrides: Overrides) -> ConfigResult<Self> {
        Self::from_lookup(|var| env::var(var).ok(), overrides)
    }

    /// Only the api-files root, for commands that never read the database.
    pub fn start_folder_from_env(start_folder: Option<PathBuf>) -> ConfigResult<PathBuf> {
        start_folder
            .or_else(|| env::var(START_FOLDER_VAR).ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .ok_or(ConfigError::Missing(START_FOLDER_VAR))
    }

    /// Load from any variable lookup.
    pub fn from_lookup<L>(lookup: L, overrides: Overrides) -> ConfigResult<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        };

        let start_folder = overrides
            .start_folder
            .or_else(|| var(START_FOLDER_VAR))
            .ok_or(ConfigError::Missing(START_FOLDER_VAR))?;

        let database_dir = overrides
            .database_dir
            .or_else(|| var(DATABASE_DIR_VAR))
            .ok_or(ConfigError::Missing(DATABASE_DIR_VAR))?;
        if !database_dir.is_dir() {
            return Err(ConfigError::InvalidPath {
                var: DATABASE_DIR_VAR,
                path: database_dir,
                expected: "directory",
            });
        }

        let index_html = overrides.index_html.or_else(|| var(INDEX_HTML_VAR));
        if let Some(ref path) = index_html {
            if !path.is_file() {
                return Err(ConfigError::InvalidPath {
                    var: INDEX_HTML_VAR,
                    path: path.clone(),
                    expected: "file",
                });
            }
        }

        Ok(Self {
            start_folder,
            database_dir,
            index_html,
        })
    }
}
