//! Domain models for the api-files exporter.
//!
//! Records coming out of the table loader are ordered key/value maps
//! ([`Record`]). The join engine wraps them in working types that carry the
//! canonical ids needed for joining:
//!
//! - [`RecordId`] - id normalized once at ingestion
//! - [`Event`] - competition edition with its nested tables
//! - [`Program`] - distance/sport parameter set shared by races
//! - [`Race`] - single race, with its programs and results
//! - [`ProgramRace`] - program/race relationship
//! - [`ResultsFile`] - marks a race as published

pub mod fields;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// A loaded table row: column name → display value, in column order.
pub type Record = Map<String, Value>;

// =============================================================================
// Record Id
// =============================================================================

/// Canonical id of a database row.
///
/// Cells that parse as an unsigned integer become [`RecordId::Numeric`], so
/// `"7"`, `" 7"` and `"007"` are the same id. Anything else is kept as trimmed
/// text and never equals a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Numeric(u64),
    Text(String),
}

impl RecordId {
    /// Parse a cell value. Blank cells have no id.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<u64>() {
            Ok(n) => Some(RecordId::Numeric(n)),
            Err(_) => Some(RecordId::Text(trimmed.to_string())),
        }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => match n.as_u64() {
                Some(n) => Some(RecordId::Numeric(n)),
                None => Self::parse(&n.to_string()),
            },
            _ => None,
        }
    }

    /// Id stored under `field` of a record.
    pub fn of(record: &Record, field: &str) -> Option<Self> {
        record.get(field).and_then(Self::from_value)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Numeric(n)
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (RecordId::Numeric(a), RecordId::Numeric(b)) => a.cmp(b),
            (RecordId::Numeric(_), RecordId::Text(_)) => Ordering::Less,
            (RecordId::Text(_), RecordId::Numeric(_)) => Ordering::Greater,
            (RecordId::Text(a), RecordId::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Numeric(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// String value of a record field, if present and textual.
pub fn text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(|v| v.as_str())
}

/// Like [`text`] but blank strings count as missing.
pub fn non_blank<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    text(record, field).map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Program
// =============================================================================

/// A parameter set (sport, distances, laps) shared by one or more races.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub id: RecordId,
    pub event_id: Option<RecordId>,
    pub fields: Record,
}

impl Program {
    /// Wrap a loaded record. Rows without an id are not programs.
    pub fn from_record(fields: Record) -> Option<Self> {
        let id = RecordId::of(&fields, fields::ID)?;
        let event_id = RecordId::of(&fields, fields::EVENT_ID);
        Some(Self {
            id,
            event_id,
            fields,
        })
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

// =============================================================================
// Program / Race relationship
// =============================================================================

/// One row of the program/race join table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRace {
    pub program_id: RecordId,
    pub race_id: RecordId,
}

impl ProgramRace {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            program_id: RecordId::of(record, fields::PROGRAM_ID)?,
            race_id: RecordId::of(record, fields::RACE_ID)?,
        })
    }
}

// =============================================================================
// Race
// =============================================================================

/// A single race of an event.
///
/// `programs` and `results` are filled in by the join engine; before that they
/// are empty / absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Race {
    pub id: RecordId,
    pub fields: Record,
    pub programs: Vec<Program>,
    pub results: Option<Vec<Record>>,
}

impl Race {
    pub fn from_record(fields: Record) -> Option<Self> {
        let id = RecordId::of(&fields, fields::ID)?;
        Some(Self {
            id,
            fields,
            programs: Vec::new(),
            results: None,
        })
    }

    pub fn reference(&self) -> Option<&str> {
        non_blank(&self.fields, fields::RACE_REFERENCE)
    }

    pub fn results_range_name(&self) -> Option<&str> {
        non_blank(&self.fields, fields::RESULTS_RANGE_NAME)
    }
}

// =============================================================================
// Results File
// =============================================================================

/// A published results artifact of a race.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsFile {
    pub race_id: RecordId,
    pub fields: Record,
}

impl ResultsFile {
    pub fn from_record(fields: Record) -> Option<Self> {
        let race_id = RecordId::of(&fields, fields::RACE_ID)?;
        Some(Self { race_id, fields })
    }
}

// =============================================================================
// Event
// =============================================================================

/// A competition edition with everything joined onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: RecordId,
    pub fields: Record,
    pub event_files: Vec<Record>,
    pub organizers: Vec<Record>,
    pub programs: Vec<Program>,
    pub races: Vec<Race>,
    pub results_files: Vec<ResultsFile>,
}

impl Event {
    /// Create an event with nothing joined yet.
    pub fn from_record(fields: Record) -> Option<Self> {
        let id = RecordId::of(&fields, fields::ID)?;
        Some(Self {
            id,
            fields,
            event_files: Vec::new(),
            organizers: Vec::new(),
            programs: Vec::new(),
            races: Vec::new(),
            results_files: Vec::new(),
        })
    }

    /// `YYYY-slug` reference.
    pub fn reference(&self) -> Option<&str> {
        non_blank(&self.fields, fields::EVENT_REFERENCE)
    }

    /// Id of the workbook holding this event's results ranges.
    pub fn results_workbook(&self) -> Option<&str> {
        non_blank(&self.fields, fields::RESULTS_WORKBOOK)
    }
}

// =============================================================================
// Tests
// =============================================================================
