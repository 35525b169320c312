//! Record store over a directory of CSV range exports.
//!
//! ```text
//! <root>/<workbook id>/<range name>.csv
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{RecordStore, Table};
use crate::error::{StoreError, StoreResult};
use crate::logs::log_info_indent;
use crate::parser::parse_bytes_auto;

/// Workbooks exported as one directory each.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    root: PathBuf,
}

impl CsvRecordStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a range file.
    pub fn range_path(&self, workbook: &str, range: &str) -> StoreResult<PathBuf> {
        check_name(workbook)?;
        check_name(range)?;
        Ok(self.root.join(workbook).join(format!("{}.csv", range)))
    }
}

fn check_name(name: &str) -> StoreResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl RecordStore for CsvRecordStore {
    fn table(&self, workbook: &str, range: &str) -> StoreResult<Table> {
        let path = self.range_path(workbook, range)?;

        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::RangeNotFound {
                workbook: workbook.to_string(),
                range: range.to_string(),
            },
            _ => StoreError::Io {
                workbook: workbook.to_string(),
                range: range.to_string(),
                source: e,
            },
        })?;

        let parsed = parse_bytes_auto(&bytes, range)?;
        log_info_indent(
            format!(
                "{} {}: {} rows ({}, '{}')",
                workbook,
                range,
                parsed.table.rows.len(),
                parsed.encoding,
                format_delimiter(parsed.delimiter)
            ),
            1,
        );

        Ok(parsed.table)
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
