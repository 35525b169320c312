//! Record store: where the competition database ranges come from.
//!
//! A workbook is addressed by its id and exposes named ranges. Each range is
//! a grid of display values whose first non-blank row names the columns.
//!
//! - [`CsvRecordStore`] - one directory per workbook, one CSV file per range
//! - [`MemoryRecordStore`] - in-memory ranges, for tests and embedding

mod csv;
mod memory;

pub use self::csv::CsvRecordStore;
pub use self::memory::MemoryRecordStore;

use crate::error::StoreResult;

// =============================================================================
// Range names
// =============================================================================

pub const TABLE_EVENT: &str = "TableEvent";
pub const TABLE_EVENT_FILE: &str = "TableEventFile";
pub const TABLE_EVENT_ORGANIZER: &str = "TableEventOrganizer";
pub const TABLE_ORGANIZER: &str = "TableOrganizer";
pub const TABLE_PROGRAM: &str = "TableProgram";
pub const TABLE_PROGRAM_RACE: &str = "TableProgramRace";
pub const TABLE_RACE: &str = "TableRace";
pub const TABLE_RESULTS_FILE: &str = "TableResultsFile";

// =============================================================================
// Table
// =============================================================================

/// Raw display values of one named range, header row included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a table from string literals.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Rows whose first column holds something; blank rows are padding.
    pub fn filled_rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows
            .iter()
            .map(Vec::as_slice)
            .filter(|row| row.first().is_some_and(|cell| !cell.trim().is_empty()))
    }

    /// Column names: the first filled row.
    pub fn header_row(&self) -> Option<&[String]> {
        self.filled_rows().next()
    }

    /// Filled rows after the header.
    pub fn data_rows(&self) -> impl Iterator<Item = &[String]> {
        self.filled_rows().skip(1)
    }
}

// =============================================================================
// Record Store
// =============================================================================

/// Source of named ranges.
pub trait RecordStore {
    /// All rows of `range` in `workbook`.
    fn table(&self, workbook: &str, range: &str) -> StoreResult<Table>;

    /// Column names of `range`; empty when the range holds no filled row.
    fn header_row(&self, workbook: &str, range: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .table(workbook, range)?
            .header_row()
            .map(<[String]>::to_vec)
            .unwrap_or_default())
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn table(&self, workbook: &str, range: &str) -> StoreResult<Table> {
        (**self).table(workbook, range)
    }
}
