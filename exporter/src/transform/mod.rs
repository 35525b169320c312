//! Transformation module.
//!
//! This module turns database ranges into api-files artifacts:
//! - Loader: raw rows to records
//! - Join: event/program/race joins and published filtering
//! - Shaper: public DTO shapes
//! - Serialize: JSON text
//! - Pipeline: one build per artifact family

pub mod join;
pub mod loader;
pub mod pipeline;
pub mod serialize;
pub mod shaper;

#[cfg(test)]
pub(crate) mod fixtures;

pub use join::{filter_published, flatten_single_program_fields, Flatten, JoinEngine};
pub use loader::{load_records, parse_boolean, FieldExposure, TableSpec};
pub use pipeline::{build_event, build_events_list, build_race, year_of, EventBuild, RaceArtifact, RaceBuild};
pub use serialize::to_json;
pub use shaper::{event_dto, events_list_dto, race_dto, race_summary};
