//! Error types for the api-files export pipeline.
//!
//! Errors are grouped by the layer that raises them:
//!
//! - [`StoreError`] - reading named ranges from the record store
//! - [`JoinError`] - resolving events, programs and races
//! - [`FileStoreError`] - writing artifacts and folders
//! - [`ConfigError`] - startup configuration
//! - [`ValidationError`] - artifact schema checks
//! - [`ExportError`] - top-level command errors
//!
//! Conversion is automatic via `From` implementations, so `?` works across
//! layer boundaries.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Record Store Errors
// =============================================================================

/// Errors raised while reading a named range.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The range file exists but could not be read.
    #[error("Failed to read range '{range}' of workbook '{workbook}': {source}")]
    Io {
        workbook: String,
        range: String,
        #[source]
        source: std::io::Error,
    },

    /// No such range in the workbook.
    #[error("Range '{range}' not found in workbook '{workbook}'")]
    RangeNotFound { workbook: String, range: String },

    /// The range content is not valid CSV.
    #[error("Invalid CSV in range '{range}': {message}")]
    Parse { range: String, message: String },

    /// Workbook ids and range names are plain names, never paths.
    #[error("Invalid workbook or range name: '{0}'")]
    InvalidName(String),
}

// =============================================================================
// Join Errors
// =============================================================================

/// Kind of entity a lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Event,
    Program,
    Race,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Event => write!(f, "Event"),
            Entity::Program => write!(f, "Program"),
            Entity::Race => write!(f, "Race"),
        }
    }
}

/// Errors raised while joining the database tables.
#[derive(Debug, Error)]
pub enum JoinError {
    /// A lookup by id or reference matched no record.
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    /// Every race must belong to at least one program.
    #[error("Race {0} does not belong to any program")]
    RaceWithoutProgram(String),

    /// A field needed to follow a reference is blank.
    #[error("{entity} {id} has no '{field}' value")]
    MissingField {
        entity: Entity,
        id: String,
        field: &'static str,
    },

    /// Underlying record store failure.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),
}

impl JoinError {
    pub fn not_found(entity: Entity, key: impl fmt::Display) -> Self {
        JoinError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// True for the "bad selection" class of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, JoinError::NotFound { .. })
    }
}

// =============================================================================
// File Store Errors
// =============================================================================

/// Errors from the artifact file store.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// Creating, replacing or reading a file or folder failed.
    #[error("File store IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File and folder names are single path components.
    #[error("Invalid file or folder name: '{0}'")]
    InvalidName(String),

    /// A file sits where a folder is expected.
    #[error("Not a folder: '{}'", .0.display())]
    NotAFolder(PathBuf),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while building the startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is neither in the environment nor on the command line.
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// A setting points at something unusable.
    #[error("Invalid path for {var}: '{}' is not an existing {expected}", path.display())]
    InvalidPath {
        var: &'static str,
        path: PathBuf,
        expected: &'static str,
    },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Artifact schema violations.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The artifact does not match its embedded schema.
    #[error("{artifact} failed schema validation: {}", errors.join("; "))]
    Schema { artifact: String, errors: Vec<String> },
}

// =============================================================================
// Export Errors (top-level)
// =============================================================================

/// Top-level export command errors.
///
/// Returned by every [`crate::export::Exporter`] command; wraps the
/// lower-level errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Join error (includes "not found").
    #[error("{0}")]
    Join(#[from] JoinError),

    /// File store error.
    #[error("{0}")]
    FileStore(#[from] FileStoreError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Artifact validation error.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Event references start with their four digit year.
    #[error("Invalid event reference '{0}': expected YYYY-slug")]
    InvalidReference(String),
}

impl From<StoreError> for ExportError {
    fn from(err: StoreError) -> Self {
        ExportError::Join(JoinError::Store(err))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for join operations.
pub type JoinResult<T> = Result<T, JoinError>;

/// Result type for file store operations.
pub type FileStoreResult<T> = Result<T, FileStoreError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for export commands.
pub type ExportResult<T> = Result<T, ExportError>;
