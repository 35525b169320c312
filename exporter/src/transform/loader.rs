//! Table loader: raw range rows → ordered records.
//!
//! ```text
//! ┌────┬───────┬──────────────┐        { "id": "101",
//! │ id │ title │ championship │   →      "title": "Elite" }
//! │101 │ Elite │ Nacional     │        (championship not exposed)
//! └────┴───────┴──────────────┘
//! ```
//!
//! Rows whose first column is blank are skipped, columns outside the exposed
//! set are dropped, and cells missing from short rows are simply absent.

use serde_json::Value;

use crate::models::{fields, Record};
use crate::store::Table;

/// Which columns of a range end up in the records.
#[derive(Debug, Clone, Copy)]
pub enum FieldExposure<'a> {
    /// Only the listed columns.
    Only(&'a [&'a str]),
    /// Every named column except the listed ones.
    AllExcept(&'a [&'a str]),
}

impl FieldExposure<'_> {
    pub fn exposes(&self, column: &str) -> bool {
        if column.is_empty() {
            return false;
        }
        match self {
            FieldExposure::Only(allowed) => allowed.contains(&column),
            FieldExposure::AllExcept(hidden) => !hidden.contains(&column),
        }
    }
}

/// How one range is loaded.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec<'a> {
    pub exposure: FieldExposure<'a>,
    /// Columns parsed with [`parse_boolean`] instead of kept as text.
    pub booleans: &'a [&'a str],
}

impl<'a> TableSpec<'a> {
    pub const fn only(fields: &'a [&'a str]) -> Self {
        Self {
            exposure: FieldExposure::Only(fields),
            booleans: &[],
        }
    }

    pub const fn all_except(fields: &'a [&'a str]) -> Self {
        Self {
            exposure: FieldExposure::AllExcept(fields),
            booleans: &[],
        }
    }

    pub const fn with_booleans(mut self, booleans: &'a [&'a str]) -> Self {
        self.booleans = booleans;
        self
    }
}

/// Every named column, as text.
pub const ALL_FIELDS: TableSpec<'static> = TableSpec::all_except(&[]);

/// Events, full record.
pub const EVENT_SPEC: TableSpec<'static> = TableSpec::only(fields::EVENT_FIELDS);

/// Programs.
pub const PROGRAM_SPEC: TableSpec<'static> = TableSpec::only(fields::PROGRAM_FIELDS);

/// Races, minus the internal columns.
pub const RACE_SPEC: TableSpec<'static> =
    TableSpec::all_except(fields::RACE_HIDDEN_FIELDS).with_booleans(fields::RACE_BOOLEAN_FIELDS);

/// Parse a spreadsheet checkbox / yes-no display value.
///
/// Accepts the English and Portuguese display forms of a checked box.
pub fn parse_boolean(raw: &str) -> bool {
    matches!(
        raw.trim().to_uppercase().as_str(),
        "TRUE" | "VERDADEIRO" | "SIM" | "YES" | "1" | "X"
    )
}

/// Load the records of a table.
pub fn load_records(table: &Table, spec: &TableSpec<'_>) -> Vec<Record> {
    let Some(header) = table.header_row() else {
        return Vec::new();
    };

    let columns: Vec<(usize, &str)> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (i, name.trim()))
        .filter(|(_, name)| spec.exposure.exposes(name))
        .collect();

    table
        .data_rows()
        .map(|row| {
            let mut record = Record::new();
            for &(i, name) in &columns {
                let Some(cell) = row.get(i) else { continue };
                let value = if spec.booleans.contains(&name) {
                    Value::Bool(parse_boolean(cell))
                } else {
                    Value::String(cell.clone())
                };
                record.insert(name.to_string(), value);
            }
            record
        })
        .collect()
}
