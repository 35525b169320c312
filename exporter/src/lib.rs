//! # api-files - competition database to public JSON artifacts
//!
//! Reads the federation's competition database (one workbook of named ranges
//! per season, exported as CSV) and writes the JSON files served by the public
//! file API: the events list of a year, one file per event and one file per
//! published race with its results.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │ RecordStore │───▶│   Loader    │───▶│ Join engine │───▶│ DTO shaper  │───▶│  FileStore  │
//! │ (CSV ranges)│    │  (records)  │    │ (published) │    │ + validate  │    │ (JSON tree) │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use api_files::{CsvRecordStore, Exporter, LocalFileStore, RecordId};
//!
//! let exporter = Exporter::new(CsvRecordStore::new("database"), LocalFileStore::new("api-files"));
//! let summary = exporter.event_with_races("db-2024", &RecordId::Numeric(7))?;
//! println!("Wrote {} files", summary.written.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Record ids, events, programs, races
//! - [`parser`] - CSV range parsing with auto-detection
//! - [`store`] - Record store (CSV directory, in memory)
//! - [`transform`] - Loader, joins, DTO shaping, serialization
//! - [`validation`] - Artifact schema validation
//! - [`files`] - File store
//! - [`export`] - Export commands
//! - [`config`] - Environment configuration
//! - [`logs`] - Leveled logging
//! - [`server`] - Preview server

// Core modules
pub mod error;
pub mod models;

// Reading
pub mod parser;
pub mod store;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Writing
pub mod export;
pub mod files;

// Runtime
pub mod config;
pub mod logs;
pub mod server;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, Entity, ExportError, ExportResult, FileStoreError, JoinError, StoreError,
    ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Event, Program, ProgramRace, Race, Record, RecordId, ResultsFile};

// =============================================================================
// Re-exports - Stores
// =============================================================================

pub use files::{FileStore, Folder, LocalFileStore, MimeType, StoredFile};
pub use store::{CsvRecordStore, MemoryRecordStore, RecordStore, Table};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    build_event, build_events_list, build_race, year_of, EventBuild, RaceArtifact, RaceBuild,
};
pub use validation::{is_valid, validate, validate_event, validate_events_list, validate_race};

// =============================================================================
// Re-exports - Commands
// =============================================================================

pub use config::{Config, Overrides};
pub use export::{ExportSummary, Exporter};
pub use server::start_server;
