//! High-level builds: one function per artifact family.
//!
//! Each build reads the database fresh, joins, filters, shapes and returns the
//! artifacts in memory. Writing them is left to [`crate::export`].
//!
//! # Example
//!
//! ```rust,ignore
//! use api_files::store::CsvRecordStore;
//! use api_files::transform::pipeline::build_event;
//! use api_files::models::RecordId;
//!
//! let store = CsvRecordStore::new("database");
//! let build = build_event(&store, "db-2024", &RecordId::Numeric(7), true)?;
//! println!("{} published races", build.races.len());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Entity, ExportError, ExportResult, JoinError, JoinResult};
use crate::logs::{log_info, log_success, log_warning};
use crate::models::{fields, Event, Race, RecordId};
use crate::store::RecordStore;

use super::join::{filter_published, flatten_races, flatten_single_program_fields, is_published, Flatten, JoinEngine};
use super::shaper::{event_dto, events_list_dto, race_dto};

static EVENT_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-\S+$").expect("valid event reference pattern"));

/// Year folder of an event reference (`2024-lisboa` → `2024`).
pub fn year_of(event_reference: &str) -> ExportResult<String> {
    EVENT_REFERENCE
        .captures(event_reference.trim())
        .and_then(|caps| caps.get(1))
        .map(|year| year.as_str().to_string())
        .ok_or_else(|| ExportError::InvalidReference(event_reference.to_string()))
}

/// A race artifact ready to be written.
#[derive(Debug, Clone)]
pub struct RaceArtifact {
    pub race_reference: String,
    pub dto: Value,
}

/// Result of an event build.
#[derive(Debug, Clone)]
pub struct EventBuild {
    pub year: String,
    pub event_reference: String,
    /// Event artifact (race list narrowed).
    pub dto: Value,
    /// Full race artifacts; empty unless races were requested.
    pub races: Vec<RaceArtifact>,
    /// Non-fatal findings, also logged.
    pub warnings: Vec<String>,
}

/// Result of a single race build.
#[derive(Debug, Clone)]
pub struct RaceBuild {
    pub year: String,
    pub race: RaceArtifact,
    pub warnings: Vec<String>,
}

/// Events list of a database. An empty event table yields `[]`.
pub fn build_events_list<S: RecordStore + ?Sized>(store: &S, database: &str) -> JoinResult<Value> {
    log_info(format!("📖 Reading events of {}...", database));
    let events = JoinEngine::new(store, database).events()?;
    log_success(format!("{} events", events.len()));
    Ok(events_list_dto(&events))
}

fn event_reference(event: &Event) -> JoinResult<String> {
    event
        .reference()
        .map(str::to_string)
        .ok_or_else(|| JoinError::MissingField {
            entity: Entity::Event,
            id: event.id.to_string(),
            field: fields::EVENT_REFERENCE,
        })
}

fn race_reference(race: &Race) -> JoinResult<String> {
    race.reference()
        .map(str::to_string)
        .ok_or_else(|| JoinError::MissingField {
            entity: Entity::Race,
            id: race.id.to_string(),
            field: fields::RACE_REFERENCE,
        })
}

/// Build the event artifact and, with `with_races`, one artifact per
/// published race including its results.
pub fn build_event<S: RecordStore + ?Sized>(
    store: &S,
    database: &str,
    event_id: &RecordId,
    with_races: bool,
) -> ExportResult<EventBuild> {
    let engine = JoinEngine::new(store, database);

    log_info(format!("🔗 Joining event {}...", event_id));
    let mut event = engine.load_event(event_id)?;
    let event_reference = event_reference(&event)?;
    let year = year_of(&event_reference)?;
    log_success(format!(
        "{}: {} programs, {} races, {} results files",
        event_reference,
        event.programs.len(),
        event.races.len(),
        event.results_files.len()
    ));

    let total = event.races.len();
    filter_published(&mut event);
    log_success(format!("{} of {} races published", event.races.len(), total));

    let mut warnings = Vec::new();
    let mut races = Vec::new();
    if with_races {
        warnings.extend(flatten_races(&mut event));
        log_info("📊 Reading results...");
        engine.attach_results(&mut event)?;
        for race in &event.races {
            races.push(RaceArtifact {
                race_reference: race_reference(race)?,
                dto: race_dto(race),
            });
        }
    }

    Ok(EventBuild {
        year,
        event_reference,
        dto: event_dto(&event),
        races,
        warnings,
    })
}

/// Build the artifact of one race, looked up by reference.
///
/// The race is exported even when unpublished; a warning says so.
pub fn build_race<S: RecordStore + ?Sized>(
    store: &S,
    database: &str,
    race_ref: &str,
) -> ExportResult<RaceBuild> {
    let engine = JoinEngine::new(store, database);

    log_info(format!("🔗 Resolving race {}...", race_ref));
    let mut race = engine.resolve_race(race_ref)?;
    let event = engine.event_of_race(&race)?;
    let year = year_of(&event_reference(&event)?)?;

    let mut warnings = Vec::new();
    let results_files = engine.results_files_for_races(std::slice::from_ref(&race.id))?;
    if !is_published(&race, &results_files) {
        let msg = format!("Race {} has no results file and is not published", race.id);
        log_warning(msg.clone());
        warnings.push(msg);
    }

    if let Flatten::Ambiguous(count) = flatten_single_program_fields(&mut race) {
        let msg = format!(
            "Race {} belongs to {} programs; distance fields left unset",
            race.id, count
        );
        log_warning(msg.clone());
        warnings.push(msg);
    }

    engine.attach_race_results(&event, &mut race)?;
    log_success(format!(
        "{} results",
        race.results.as_ref().map_or(0, Vec::len)
    ));

    Ok(RaceBuild {
        year,
        race: RaceArtifact {
            race_reference: race_reference(&race)?,
            dto: race_dto(&race),
        },
        warnings,
    })
}
