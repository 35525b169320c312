//! In-memory record store.

use std::collections::HashMap;

use super::{RecordStore, Table};
use crate::error::{StoreError, StoreResult};

/// Ranges held in memory, keyed by (workbook, range).
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    ranges: HashMap<(String, String), Table>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a range.
    pub fn insert(&mut self, workbook: &str, range: &str, table: Table) {
        self.ranges
            .insert((workbook.to_string(), range.to_string()), table);
    }

    /// Builder form of [`MemoryRecordStore::insert`].
    pub fn with_range<R, C>(mut self, workbook: &str, range: &str, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.insert(workbook, range, Table::from_rows(rows));
        self
    }
}

impl RecordStore for MemoryRecordStore {
    fn table(&self, workbook: &str, range: &str) -> StoreResult<Table> {
        self.ranges
            .get(&(workbook.to_string(), range.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::RangeNotFound {
                workbook: workbook.to_string(),
                range: range.to_string(),
            })
    }
}
