//! DTO shaper: the public shape of joined events and races.
//!
//! # Output Format
//!
//! - Event artifact: event columns (no `googleSheetID`), then `eventFiles`,
//!   `organizers`, `programs`, `races` (narrowed to id/reference/title/subtitle)
//!   and `resultsFiles`.
//! - Race artifact: race columns (no `googleSheetID`, no `resultsRangeName`),
//!   then `programs` and `results`.
//! - Events list: one object per event, event columns only.
//!
//! Fields that are absent on the source record are omitted, never `null`.

use serde_json::Value;

use crate::models::{fields, Event, Program, Race, Record};

/// Fields that only make sense inside the database.
const INTERNAL_FIELDS: &[&str] = &[fields::RESULTS_WORKBOOK, fields::RESULTS_RANGE_NAME];

fn public_fields(record: &Record) -> Record {
    record
        .iter()
        .filter(|(key, _)| !INTERNAL_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn records(list: &[Record]) -> Value {
    Value::Array(list.iter().cloned().map(Value::Object).collect())
}

fn programs(list: &[Program]) -> Value {
    Value::Array(list.iter().map(Program::to_value).collect())
}

/// Race as listed inside an event artifact.
pub fn race_summary(race: &Race) -> Value {
    let mut obj = Record::new();
    for &field in fields::RACE_SUMMARY_FIELDS {
        if let Some(value) = race.fields.get(field) {
            obj.insert(field.to_string(), value.clone());
        }
    }
    Value::Object(obj)
}

/// Event artifact.
pub fn event_dto(event: &Event) -> Value {
    let mut obj = public_fields(&event.fields);

    obj.insert(fields::EVENT_FILES.to_string(), records(&event.event_files));
    obj.insert(fields::ORGANIZERS.to_string(), records(&event.organizers));
    obj.insert(fields::PROGRAMS.to_string(), programs(&event.programs));
    obj.insert(
        fields::RACES.to_string(),
        Value::Array(event.races.iter().map(race_summary).collect()),
    );
    obj.insert(
        fields::RESULTS_FILES.to_string(),
        Value::Array(
            event
                .results_files
                .iter()
                .map(|file| Value::Object(file.fields.clone()))
                .collect(),
        ),
    );

    Value::Object(obj)
}

/// Race artifact.
pub fn race_dto(race: &Race) -> Value {
    let mut obj = public_fields(&race.fields);

    obj.insert(fields::PROGRAMS.to_string(), programs(&race.programs));
    if let Some(ref results) = race.results {
        obj.insert(fields::RESULTS.to_string(), records(results));
    }

    Value::Object(obj)
}

/// Events list artifact.
pub fn events_list_dto(events: &[Record]) -> Value {
    Value::Array(
        events
            .iter()
            .map(|event| {
                let obj: Record = fields::EVENT_FIELDS
                    .iter()
                    .filter_map(|&field| event.get(field).map(|v| (field.to_string(), v.clone())))
                    .collect();
                Value::Object(obj)
            })
            .collect(),
    )
}
