//! Join engine: rebuilds the Event → Programs → Races → Results tree from the
//! normalized database tables.
//!
//! # Architecture
//!
//! ```text
//! TableEvent ──┐
//! TableProgram ┼─ resolve_event ──┐
//! TableEvent*  ┘                  │
//!                                 ▼
//! TableProgramRace ┐       resolve_races_for_programs ── filter_published
//! TableRace        ┘                                           │
//!                                                              ▼
//! TableResultsFile ── results_files_for_races      flatten_single_program_fields
//!                                                              │
//! <results workbook>/<resultsRangeName> ─────────────▶ attach_results
//! ```
//!
//! Races and programs are always listed by ascending id. Ids are compared as
//! canonical [`RecordId`]s, never as raw cell text.

use std::collections::HashSet;

use crate::error::{Entity, JoinError, JoinResult};
use crate::logs::log_warning;
use crate::models::{fields, Event, Program, ProgramRace, Race, Record, RecordId, ResultsFile};
use crate::store::{
    RecordStore, TABLE_EVENT, TABLE_EVENT_FILE, TABLE_EVENT_ORGANIZER, TABLE_ORGANIZER,
    TABLE_PROGRAM, TABLE_PROGRAM_RACE, TABLE_RACE, TABLE_RESULTS_FILE,
};

use super::loader::{load_records, TableSpec, ALL_FIELDS, EVENT_SPEC, PROGRAM_SPEC, RACE_SPEC};

/// Joins the tables of one database workbook.
pub struct JoinEngine<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    database: &'a str,
}

impl<'a, S: RecordStore + ?Sized> JoinEngine<'a, S> {
    pub fn new(store: &'a S, database: &'a str) -> Self {
        Self { store, database }
    }

    fn load(&self, range: &str, spec: &TableSpec<'_>) -> JoinResult<Vec<Record>> {
        let table = self.store.table(self.database, range)?;
        Ok(load_records(&table, spec))
    }

    /// Every event row of the database.
    pub fn events(&self) -> JoinResult<Vec<Record>> {
        self.load(TABLE_EVENT, &EVENT_SPEC)
    }

    pub fn programs(&self) -> JoinResult<Vec<Program>> {
        Ok(self
            .load(TABLE_PROGRAM, &PROGRAM_SPEC)?
            .into_iter()
            .filter_map(Program::from_record)
            .collect())
    }

    pub fn races(&self) -> JoinResult<Vec<Race>> {
        Ok(self
            .load(TABLE_RACE, &RACE_SPEC)?
            .into_iter()
            .filter_map(Race::from_record)
            .collect())
    }

    pub fn program_races(&self) -> JoinResult<Vec<ProgramRace>> {
        Ok(self
            .load(TABLE_PROGRAM_RACE, &ALL_FIELDS)?
            .iter()
            .filter_map(ProgramRace::from_record)
            .collect())
    }

    /// Locate an event and attach its organizers, files and programs.
    pub fn resolve_event(&self, event_id: &RecordId) -> JoinResult<Event> {
        let record = self
            .events()?
            .into_iter()
            .find(|record| RecordId::of(record, fields::ID).as_ref() == Some(event_id))
            .ok_or_else(|| JoinError::not_found(Entity::Event, event_id))?;

        let mut event =
            Event::from_record(record).ok_or_else(|| JoinError::not_found(Entity::Event, event_id))?;

        event.organizers = self.organizers_for_event(event_id)?;
        event.event_files = self.event_files_for_event(event_id)?;
        event.programs = self.programs_for_event(event_id)?;

        Ok(event)
    }

    /// Event with programs, races and results files joined, nothing filtered.
    pub fn load_event(&self, event_id: &RecordId) -> JoinResult<Event> {
        let mut event = self.resolve_event(event_id)?;
        event.races = self.resolve_races_for_programs(&event.programs)?;

        let race_ids: Vec<RecordId> = event.races.iter().map(|race| race.id.clone()).collect();
        event.results_files = self.results_files_for_races(&race_ids)?;

        Ok(event)
    }

    /// Programs whose parent is the event, by ascending id.
    pub fn programs_for_event(&self, event_id: &RecordId) -> JoinResult<Vec<Program>> {
        let mut programs: Vec<Program> = self
            .programs()?
            .into_iter()
            .filter(|program| program.event_id.as_ref() == Some(event_id))
            .collect();
        programs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(programs)
    }

    pub fn event_files_for_event(&self, event_id: &RecordId) -> JoinResult<Vec<Record>> {
        Ok(self
            .load(TABLE_EVENT_FILE, &ALL_FIELDS)?
            .into_iter()
            .filter(|record| RecordId::of(record, fields::EVENT_ID).as_ref() == Some(event_id))
            .collect())
    }

    /// Organizers linked to the event, in link order.
    pub fn organizers_for_event(&self, event_id: &RecordId) -> JoinResult<Vec<Record>> {
        let organizer_ids: Vec<RecordId> = self
            .load(TABLE_EVENT_ORGANIZER, &ALL_FIELDS)?
            .iter()
            .filter(|link| RecordId::of(link, fields::EVENT_ID).as_ref() == Some(event_id))
            .filter_map(|link| RecordId::of(link, fields::ORGANIZER_ID))
            .collect();

        if organizer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let organizers = self.load(TABLE_ORGANIZER, &ALL_FIELDS)?;
        Ok(organizer_ids
            .iter()
            .filter_map(|id| {
                organizers
                    .iter()
                    .find(|org| RecordId::of(org, fields::ID).as_ref() == Some(id))
                    .cloned()
            })
            .collect())
    }

    /// Races of the given programs, each carrying its programs.
    pub fn resolve_races_for_programs(&self, programs: &[Program]) -> JoinResult<Vec<Race>> {
        if programs.is_empty() {
            return Ok(Vec::new());
        }
        let relationships = self.program_races()?;
        let races = self.races()?;
        Ok(join_races(programs, &relationships, races))
    }

    /// Results files of the given races, in table order.
    pub fn results_files_for_races(&self, race_ids: &[RecordId]) -> JoinResult<Vec<ResultsFile>> {
        Ok(self
            .load(TABLE_RESULTS_FILE, &ALL_FIELDS)?
            .into_iter()
            .filter_map(ResultsFile::from_record)
            .filter(|file| race_ids.contains(&file.race_id))
            .collect())
    }

    /// Race by its reference, with every program it belongs to.
    pub fn resolve_race(&self, race_reference: &str) -> JoinResult<Race> {
        let wanted = race_reference.trim();
        let mut race = self
            .races()?
            .into_iter()
            .find(|race| race.reference() == Some(wanted))
            .ok_or_else(|| JoinError::not_found(Entity::Race, wanted))?;

        let relationships = self.program_races()?;
        let programs = self.programs()?;
        race.programs = race_programs(&programs, &relationships, &race.id);

        Ok(race)
    }

    /// Event a race belongs to, through its first program.
    pub fn event_of_race(&self, race: &Race) -> JoinResult<Event> {
        let program = race
            .programs
            .first()
            .ok_or_else(|| JoinError::RaceWithoutProgram(race.id.to_string()))?;
        let event_id = program.event_id.as_ref().ok_or_else(|| JoinError::MissingField {
            entity: Entity::Program,
            id: program.id.to_string(),
            field: fields::EVENT_ID,
        })?;

        let record = self
            .events()?
            .into_iter()
            .find(|record| RecordId::of(record, fields::ID).as_ref() == Some(event_id))
            .ok_or_else(|| JoinError::not_found(Entity::Event, event_id))?;

        Event::from_record(record).ok_or_else(|| JoinError::not_found(Entity::Event, event_id))
    }

    /// Result rows of one race, read from the event's results workbook.
    pub fn results_for_race(&self, event: &Event, race: &Race) -> JoinResult<Vec<Record>> {
        let workbook = event.results_workbook().ok_or_else(|| JoinError::MissingField {
            entity: Entity::Event,
            id: event.id.to_string(),
            field: fields::RESULTS_WORKBOOK,
        })?;
        let range = race.results_range_name().ok_or_else(|| JoinError::MissingField {
            entity: Entity::Race,
            id: race.id.to_string(),
            field: fields::RESULTS_RANGE_NAME,
        })?;

        let table = self.store.table(workbook, range)?;
        Ok(load_records(&table, &ALL_FIELDS))
    }

    /// Attach results to a single race and drop its range name.
    pub fn attach_race_results(&self, event: &Event, race: &mut Race) -> JoinResult<()> {
        race.results = Some(self.results_for_race(event, race)?);
        race.fields.shift_remove(fields::RESULTS_RANGE_NAME);
        Ok(())
    }

    /// Attach results to every race of the event.
    pub fn attach_results(&self, event: &mut Event) -> JoinResult<()> {
        let mut races = std::mem::take(&mut event.races);
        for race in &mut races {
            self.attach_race_results(event, race)?;
        }
        event.races = races;
        Ok(())
    }
}

// =============================================================================
// Pure joins
// =============================================================================

/// Programs of one race, by ascending id.
pub fn race_programs(
    programs: &[Program],
    relationships: &[ProgramRace],
    race_id: &RecordId,
) -> Vec<Program> {
    let program_ids: Vec<&RecordId> = relationships
        .iter()
        .filter(|rel| &rel.race_id == race_id)
        .map(|rel| &rel.program_id)
        .collect();

    let mut matched: Vec<Program> = programs
        .iter()
        .filter(|program| program_ids.contains(&&program.id))
        .cloned()
        .collect();
    matched.sort_by(|a, b| a.id.cmp(&b.id));
    matched
}

/// Keep the races referenced by the programs' relationships and attach each
/// race's programs. Races come back by ascending id.
pub fn join_races(programs: &[Program], relationships: &[ProgramRace], races: Vec<Race>) -> Vec<Race> {
    let program_ids: HashSet<&RecordId> = programs.iter().map(|p| &p.id).collect();

    let relevant: Vec<ProgramRace> = relationships
        .iter()
        .filter(|rel| program_ids.contains(&rel.program_id))
        .cloned()
        .collect();
    let race_ids: HashSet<&RecordId> = relevant.iter().map(|rel| &rel.race_id).collect();

    let mut joined: Vec<Race> = races
        .into_iter()
        .filter(|race| race_ids.contains(&race.id))
        .map(|mut race| {
            race.programs = race_programs(programs, &relevant, &race.id);
            race
        })
        .collect();
    joined.sort_by(|a, b| a.id.cmp(&b.id));
    joined
}

/// Race ids of the results files, deduplicated in first-seen order.
pub fn published_race_ids(results_files: &[ResultsFile]) -> Vec<RecordId> {
    let mut ids: Vec<RecordId> = Vec::new();
    for file in results_files {
        if !ids.contains(&file.race_id) {
            ids.push(file.race_id.clone());
        }
    }
    ids
}

pub fn is_published(race: &Race, results_files: &[ResultsFile]) -> bool {
    results_files.iter().any(|file| file.race_id == race.id)
}

/// Keep only races that have a results file.
pub fn filter_published(event: &mut Event) {
    let published = published_race_ids(&event.results_files);
    event.races.retain(|race| published.contains(&race.id));
}

/// What [`flatten_single_program_fields`] did to a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flatten {
    /// Program fields copied onto the race.
    Flattened,
    /// Race has no program; nothing to copy.
    NoProgram,
    /// Race belongs to this many programs; fields left unset.
    Ambiguous(usize),
}

/// Copy the distance/sport fields of a race's only program onto the race.
///
/// Races with several programs are left as they are: there is no rule to pick
/// one program's distances over another's.
pub fn flatten_single_program_fields(race: &mut Race) -> Flatten {
    match race.programs.as_slice() {
        [] => Flatten::NoProgram,
        [program] => {
            for &field in fields::FLATTENED_PROGRAM_FIELDS {
                if let Some(value) = program.fields.get(field) {
                    race.fields.insert(field.to_string(), value.clone());
                }
            }
            race.fields.shift_remove(fields::PROGRAM_ID);
            Flatten::Flattened
        }
        many => Flatten::Ambiguous(many.len()),
    }
}

/// Flatten every race of the event, warning about ambiguous ones.
pub fn flatten_races(event: &mut Event) -> Vec<String> {
    let mut warnings = Vec::new();
    for race in &mut event.races {
        if let Flatten::Ambiguous(count) = flatten_single_program_fields(race) {
            let msg = format!(
                "Race {} belongs to {} programs; distance fields left unset",
                race.id, count
            );
            log_warning(msg.clone());
            warnings.push(msg);
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::fixtures::{lisboa_store, DATABASE};

    fn engine(store: &crate::store::MemoryRecordStore) -> JoinEngine<'_, crate::store::MemoryRecordStore> {
        JoinEngine::new(store, DATABASE)
    }

    fn ids(races: &[Race]) -> Vec<String> {
        races.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_resolve_event_attaches_programs() {
        let store = lisboa_store();
        let event = engine(&store).resolve_event(&RecordId::Numeric(7)).unwrap();

        assert_eq!(event.reference(), Some("2024-lisboa"));
        let program_ids: Vec<String> = event.programs.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(program_ids, vec!["1", "2"]);
        assert_eq!(event.organizers.len(), 1);
        assert_eq!(event.organizers[0]["name"], "Clube de Lisboa");
        assert_eq!(event.event_files.len(), 1);
    }

    #[test]
    fn test_unknown_event_is_not_found() {
        let store = lisboa_store();
        let err = engine(&store).resolve_event(&RecordId::Numeric(99)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_races_sorted_with_sorted_programs() {
        let store = lisboa_store();
        let event = engine(&store).load_event(&RecordId::Numeric(7)).unwrap();

        assert_eq!(ids(&event.races), vec!["101", "102", "103"]);
        let race_102 = &event.races[1];
        let program_ids: Vec<String> = race_102.programs.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(program_ids, vec!["1", "2"]);
        // Race 200 belongs to another event's program.
        assert!(event.races.iter().all(|r| r.id != RecordId::Numeric(200)));
    }

    #[test]
    fn test_filter_published() {
        let store = lisboa_store();
        let mut event = engine(&store).load_event(&RecordId::Numeric(7)).unwrap();
        filter_published(&mut event);

        assert_eq!(ids(&event.races), vec!["101", "103"]);
        for race in &event.races {
            assert!(is_published(race, &event.results_files));
        }
    }

    #[test]
    fn test_published_ids_are_deduplicated_in_order() {
        let files: Vec<ResultsFile> = ["103", "101", "103"]
            .iter()
            .map(|id| ResultsFile {
                race_id: RecordId::parse(id).unwrap(),
                fields: Record::new(),
            })
            .collect();
        let shown: Vec<String> = published_race_ids(&files).iter().map(|id| id.to_string()).collect();
        assert_eq!(shown, vec!["103", "101"]);
    }

    #[test]
    fn test_scenario_single_program_races_are_flattened() {
        let store = lisboa_store();
        let mut event = engine(&store).load_event(&RecordId::Numeric(7)).unwrap();
        filter_published(&mut event);
        let warnings = flatten_races(&mut event);

        assert!(warnings.is_empty());
        assert_eq!(event.races[0].fields["sport"], "Swim");
        assert_eq!(event.races[1].fields["sport"], "Bike");
        assert_eq!(event.races[0].fields["eventID"], "7");
        assert!(event.races[0].fields.get("programID").is_none());
    }

    #[test]
    fn test_ambiguous_race_keeps_fields_unset() {
        let store = lisboa_store();
        let mut event = engine(&store).load_event(&RecordId::Numeric(7)).unwrap();
        let warnings = flatten_races(&mut event);

        assert_eq!(warnings.len(), 1);
        let race_102 = &event.races[1];
        assert!(race_102.fields.get("sport").is_none());
        assert!(race_102.fields.get("swimDistance").is_none());
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let store = lisboa_store();
        let event = engine(&store).load_event(&RecordId::Numeric(7)).unwrap();

        for race in &event.races {
            let mut once = race.clone();
            let first = flatten_single_program_fields(&mut once);
            let mut twice = once.clone();
            let second = flatten_single_program_fields(&mut twice);

            assert_eq!(first, second);
            assert_eq!(once, twice);
            if first != Flatten::Flattened {
                assert_eq!(&once, race);
            }
        }
    }

    #[test]
    fn test_flatten_without_programs_is_noop() {
        let mut race = Race::from_record(
            serde_json::json!({ "id": "5" }).as_object().cloned().unwrap(),
        )
        .unwrap();
        let before = race.clone();
        assert_eq!(flatten_single_program_fields(&mut race), Flatten::NoProgram);
        assert_eq!(race, before);
    }

    #[test]
    fn test_attach_results_drops_range_name() {
        let store = lisboa_store();
        let engine = engine(&store);
        let mut event = engine.load_event(&RecordId::Numeric(7)).unwrap();
        filter_published(&mut event);
        engine.attach_results(&mut event).unwrap();

        let race = &event.races[0];
        let results = race.results.as_ref().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["athlete"], "Maria Silva");
        assert!(race.fields.get("resultsRangeName").is_none());
    }

    #[test]
    fn test_resolve_race_by_reference() {
        let store = lisboa_store();
        let engine = engine(&store);
        let race = engine.resolve_race("2024-lisboa-open").unwrap();

        assert_eq!(race.id, RecordId::Numeric(102));
        assert_eq!(race.programs.len(), 2);
        let event = engine.event_of_race(&race).unwrap();
        assert_eq!(event.id, RecordId::Numeric(7));
    }

    #[test]
    fn test_unknown_race_reference_is_not_found() {
        let store = lisboa_store();
        let err = engine(&store).resolve_race("2024-nowhere").unwrap_err();
        assert!(matches!(err, JoinError::NotFound { entity: Entity::Race, .. }));
    }

    #[test]
    fn test_race_without_program() {
        let store = lisboa_store();
        let engine = engine(&store);
        let race = engine.resolve_race("2024-orphan").unwrap();

        assert!(race.programs.is_empty());
        assert!(matches!(
            engine.event_of_race(&race),
            Err(JoinError::RaceWithoutProgram(_))
        ));
    }
}
