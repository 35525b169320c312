//! JSON Schema validation for api-files artifacts.
//!
//! Every artifact is checked before it is written, so a malformed database
//! row never reaches the public file API.
//!
//! # Embedded Schemas
//!
//! Schemas are embedded at compile time from the `schemas/` directory:
//! - `event.json` - event artifact (race list narrowed, no workbook id)
//! - `race.json` - race artifact (programs and results, no internal fields)
//! - `events-list.json` - events list artifact
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use api_files::validation::validate_events_list;
//!
//! let list = json!([{ "id": "7", "eventReference": "2024-lisboa" }]);
//! assert!(validate_events_list(&list).is_ok());
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ValidationError;

/// Artifact kinds with an embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Event,
    Race,
    EventsList,
}

impl Artifact {
    pub fn name(&self) -> &'static str {
        match self {
            Artifact::Event => "event",
            Artifact::Race => "race",
            Artifact::EventsList => "events list",
        }
    }

    fn schema(&self) -> &'static Value {
        match self {
            Artifact::Event => &EVENT_SCHEMA,
            Artifact::Race => &RACE_SCHEMA,
            Artifact::EventsList => &EVENTS_LIST_SCHEMA,
        }
    }
}

static EVENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/event.json")).expect("Invalid embedded schema")
});

static RACE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/race.json")).expect("Invalid embedded schema")
});

static EVENTS_LIST_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/events-list.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every violation otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Simpler variant: just true/false.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate an artifact against its embedded schema.
pub fn validate_artifact(artifact: Artifact, data: &Value) -> Result<(), ValidationError> {
    validate(artifact.schema(), data).map_err(|errors| ValidationError::Schema {
        artifact: artifact.name().to_string(),
        errors,
    })
}

pub fn validate_event(data: &Value) -> Result<(), ValidationError> {
    validate_artifact(Artifact::Event, data)
}

pub fn validate_race(data: &Value) -> Result<(), ValidationError> {
    validate_artifact(Artifact::Race, data)
}

pub fn validate_events_list(data: &Value) -> Result<(), ValidationError> {
    validate_artifact(Artifact::EventsList, data)
}
