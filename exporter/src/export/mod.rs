//! Export commands.
//!
//! One method per artifact family. Each command reads the database fresh,
//! builds the artifact, validates it against its schema and writes it to the
//! file store under `<year>/events/` or `<year>/races/`.
//!
//! ```text
//! <root>/<year>/events/events.json
//! <root>/<year>/events/<eventReference>.json
//! <root>/<year>/events/<eventReference>/event-files/
//! <root>/<year>/races/<raceReference>.json
//! <root>/<year>/races/<raceReference>/results-files/
//! ```

use std::path::PathBuf;

use serde_json::Value;

use crate::error::ExportResult;
use crate::files::{FileStore, Folder, MimeType};
use crate::logs::{log_info, log_success};
use crate::models::RecordId;
use crate::store::RecordStore;
use crate::transform::pipeline::{build_event, build_events_list, build_race, RaceArtifact};
use crate::transform::serialize::to_json;
use crate::validation::{validate_event, validate_events_list, validate_race};

pub const EVENTS_FOLDER: &str = "events";
pub const RACES_FOLDER: &str = "races";
pub const EVENTS_LIST_FILE: &str = "events.json";
pub const EVENT_FILES_FOLDER: &str = "event-files";
pub const RESULTS_FILES_FOLDER: &str = "results-files";

/// What a command wrote.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl ExportSummary {
    fn merge_warnings(&mut self, warnings: Vec<String>) {
        self.warnings.extend(warnings);
    }
}

/// Runs exports from a record store into a file store.
pub struct Exporter<R, F> {
    records: R,
    files: F,
}

impl<R: RecordStore, F: FileStore> Exporter<R, F> {
    pub fn new(records: R, files: F) -> Self {
        Self { records, files }
    }

    /// Write `<year>/events/events.json` for a database.
    pub fn events_list(&self, database: &str, year: &str) -> ExportResult<ExportSummary> {
        log_info(format!("🚀 Exporting events list of {} to {}", database, year));

        let list = build_events_list(&self.records, database)?;
        validate_events_list(&list)?;

        let folder = self.files.folder_path(&[year, EVENTS_FOLDER])?;
        let path = self.write_json(&folder, EVENTS_LIST_FILE, &list)?;

        log_success("Events list exported");
        Ok(ExportSummary {
            written: vec![path],
            warnings: Vec::new(),
        })
    }

    /// Write the event artifact only.
    pub fn event(&self, database: &str, event_id: &RecordId) -> ExportResult<ExportSummary> {
        self.export_event(database, event_id, false)
    }

    /// Write the event artifact, one artifact per published race, and the
    /// upload folders next to them.
    pub fn event_with_races(&self, database: &str, event_id: &RecordId) -> ExportResult<ExportSummary> {
        self.export_event(database, event_id, true)
    }

    fn export_event(
        &self,
        database: &str,
        event_id: &RecordId,
        with_races: bool,
    ) -> ExportResult<ExportSummary> {
        log_info(format!("🚀 Exporting event {} of {}", event_id, database));

        let build = build_event(&self.records, database, event_id, with_races)?;
        validate_event(&build.dto)?;
        for race in &build.races {
            validate_race(&race.dto)?;
        }

        let mut summary = ExportSummary::default();
        summary.merge_warnings(build.warnings);

        let events = self.files.folder_path(&[build.year.as_str(), EVENTS_FOLDER])?;
        let file_name = format!("{}.json", build.event_reference);
        summary.written.push(self.write_json(&events, &file_name, &build.dto)?);

        if with_races {
            let event_folder = self.files.get_or_create_folder(&events, &build.event_reference)?;
            self.files.get_or_create_folder(&event_folder, EVENT_FILES_FOLDER)?;

            let races = self.files.folder_path(&[build.year.as_str(), RACES_FOLDER])?;
            for race in &build.races {
                summary.written.push(self.write_race(&races, race)?);
            }
        }

        log_success(format!(
            "Event {} exported ({} files)",
            build.event_reference,
            summary.written.len()
        ));
        Ok(summary)
    }

    /// Write one race artifact, looked up by reference.
    pub fn race(&self, database: &str, race_reference: &str) -> ExportResult<ExportSummary> {
        log_info(format!("🚀 Exporting race {} of {}", race_reference, database));

        let build = build_race(&self.records, database, race_reference)?;
        validate_race(&build.race.dto)?;

        let races = self.files.folder_path(&[build.year.as_str(), RACES_FOLDER])?;
        let path = self.write_race(&races, &build.race)?;

        log_success(format!("Race {} exported", build.race.race_reference));
        Ok(ExportSummary {
            written: vec![path],
            warnings: build.warnings,
        })
    }

    fn write_race(&self, races: &Folder, race: &RaceArtifact) -> ExportResult<PathBuf> {
        let race_folder = self.files.get_or_create_folder(races, &race.race_reference)?;
        self.files.get_or_create_folder(&race_folder, RESULTS_FILES_FOLDER)?;

        let file_name = format!("{}.json", race.race_reference);
        self.write_json(races, &file_name, &race.dto)
    }

    fn write_json(&self, folder: &Folder, name: &str, value: &Value) -> ExportResult<PathBuf> {
        let content = to_json(value)?;
        let stored = self
            .files
            .create_or_replace_file(folder, name, &content, MimeType::PlainText)?;
        Ok(stored.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExportError, JoinError, StoreError};
    use crate::files::LocalFileStore;
    use crate::store::MemoryRecordStore;
    use crate::transform::fixtures::{empty_store, lisboa_store, DATABASE};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn exporter(store: MemoryRecordStore, root: &Path) -> Exporter<MemoryRecordStore, LocalFileStore> {
        Exporter::new(store, LocalFileStore::new(root))
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_events_list_written() {
        let dir = tempdir().unwrap();
        let summary = exporter(lisboa_store(), dir.path())
            .events_list(DATABASE, "2024")
            .unwrap();

        let path = dir.path().join("2024/events/events.json");
        assert_eq!(summary.written, vec![path.clone()]);
        let list = read_json(&path);
        assert_eq!(list.as_array().unwrap().len(), 2);
        assert!(list[0].get("races").is_none());
    }

    #[test]
    fn test_empty_events_list_written() {
        let dir = tempdir().unwrap();
        exporter(empty_store(), dir.path()).events_list(DATABASE, "2025").unwrap();

        let content = fs::read_to_string(dir.path().join("2025/events/events.json")).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_event_written_without_race_files() {
        let dir = tempdir().unwrap();
        let summary = exporter(lisboa_store(), dir.path())
            .event(DATABASE, &RecordId::Numeric(7))
            .unwrap();

        assert_eq!(summary.written.len(), 1);
        let event = read_json(&dir.path().join("2024/events/2024-lisboa.json"));
        let race_ids: Vec<&str> = event["races"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(race_ids, vec!["101", "103"]);
        assert!(!dir.path().join("2024/races").exists());
    }

    #[test]
    fn test_event_with_races_bundle() {
        let dir = tempdir().unwrap();
        let summary = exporter(lisboa_store(), dir.path())
            .event_with_races(DATABASE, &RecordId::Numeric(7))
            .unwrap();

        assert_eq!(summary.written.len(), 3);
        let root = dir.path().join("2024");
        assert!(root.join("events/2024-lisboa/event-files").is_dir());
        assert!(root.join("races/2024-lisboa-swim/results-files").is_dir());
        assert!(root.join("races/2024-lisboa-bike/results-files").is_dir());
        assert!(!root.join("races/2024-lisboa-open.json").exists());

        let swim = read_json(&root.join("races/2024-lisboa-swim.json"));
        assert_eq!(swim["distanceType"], "Open Water");
        assert_eq!(swim["results"].as_array().unwrap().len(), 2);
        assert!(swim.get("resultsRangeName").is_none());
    }

    #[test]
    fn test_reexport_replaces_files() {
        let dir = tempdir().unwrap();
        let exporter = exporter(lisboa_store(), dir.path());

        exporter.event_with_races(DATABASE, &RecordId::Numeric(7)).unwrap();
        let first = fs::read_to_string(dir.path().join("2024/events/2024-lisboa.json")).unwrap();
        exporter.event_with_races(DATABASE, &RecordId::Numeric(7)).unwrap();
        let second = fs::read_to_string(dir.path().join("2024/events/2024-lisboa.json")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_single_race_export() {
        let dir = tempdir().unwrap();
        let summary = exporter(lisboa_store(), dir.path())
            .race(DATABASE, "2024-lisboa-open")
            .unwrap();

        assert_eq!(summary.warnings.len(), 2);
        let race = read_json(&dir.path().join("2024/races/2024-lisboa-open.json"));
        assert_eq!(race["results"][0]["athlete"], "Rita Lopes");
    }

    #[test]
    fn test_missing_results_range_aborts() {
        let dir = tempdir().unwrap();
        let err = exporter(lisboa_store(), dir.path())
            .event_with_races(DATABASE, &RecordId::Numeric(8))
            .unwrap_err();

        assert!(matches!(
            err,
            ExportError::Join(JoinError::Store(StoreError::RangeNotFound { .. }))
        ));
        assert!(!dir.path().join("2024/events/2024-porto.json").exists());
    }

    #[test]
    fn test_event_table_without_title_column() {
        use crate::store::{TABLE_EVENT, TABLE_EVENT_FILE, TABLE_EVENT_ORGANIZER, TABLE_PROGRAM, TABLE_RESULTS_FILE};

        let store = MemoryRecordStore::new()
            .with_range(
                DATABASE,
                TABLE_EVENT,
                vec![vec!["id", "eventReference", "city"], vec!["9", "2025-faro", "Faro"]],
            )
            .with_range(DATABASE, TABLE_EVENT_FILE, vec![vec!["eventID", "fileName"]])
            .with_range(DATABASE, TABLE_EVENT_ORGANIZER, vec![vec!["eventID", "organizerID"]])
            .with_range(DATABASE, TABLE_PROGRAM, vec![vec!["id", "eventID", "sport"]])
            .with_range(DATABASE, TABLE_RESULTS_FILE, vec![vec!["raceID", "fileName"]]);

        let dir = tempdir().unwrap();
        exporter(store, dir.path()).event(DATABASE, &RecordId::Numeric(9)).unwrap();

        let content = fs::read_to_string(dir.path().join("2025/events/2025-faro.json")).unwrap();
        assert_eq!(
            content,
            r#"{"id":"9","eventReference":"2025-faro","city":"Faro","eventFiles":[],"organizers":[],"programs":[],"races":[],"resultsFiles":[]}"#
        );
    }

    #[test]
    fn test_events_list_with_short_row() {
        let store = MemoryRecordStore::new().with_range(
            DATABASE,
            crate::store::TABLE_EVENT,
            vec![
                vec!["id", "eventReference", "title"],
                vec!["7", "2024-lisboa", "Triatlo de Lisboa"],
                vec!["8"],
            ],
        );

        let dir = tempdir().unwrap();
        exporter(store, dir.path()).events_list(DATABASE, "2024").unwrap();

        let content = fs::read_to_string(dir.path().join("2024/events/events.json")).unwrap();
        assert_eq!(
            content,
            r#"[{"id":"7","eventReference":"2024-lisboa","title":"Triatlo de Lisboa"},{"id":"8"}]"#
        );
    }

    #[test]
    fn test_events_list_from_csv_exports() {
        let database = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::create_dir(database.path().join(DATABASE)).unwrap();
        fs::write(
            database.path().join(DATABASE).join("TableEvent.csv"),
            "id;eventReference;title;city;googleSheetID\n7;2024-lisboa;Triatlo de Lisboa;Lisboa;results-lisboa\n;;;;\n",
        )
        .unwrap();

        let exporter = Exporter::new(
            crate::store::CsvRecordStore::new(database.path()),
            LocalFileStore::new(output.path()),
        );
        exporter.events_list(DATABASE, "2024").unwrap();

        let content = fs::read_to_string(output.path().join("2024/events/events.json")).unwrap();
        assert_eq!(
            content,
            r#"[{"id":"7","eventReference":"2024-lisboa","title":"Triatlo de Lisboa","city":"Lisboa","googleSheetID":"results-lisboa"}]"#
        );
    }

    #[test]
    fn test_orphan_race_export_fails() {
        let dir = tempdir().unwrap();
        let err = exporter(lisboa_store(), dir.path())
            .race(DATABASE, "2024-orphan")
            .unwrap_err();

        assert!(matches!(err, ExportError::Join(JoinError::RaceWithoutProgram(_))));
    }
}
