use serde::Serialize;

use crate::error::{PipelineError, Result};

pub const DISPLAY_NAME_COLUMN: &str = "Display name";
pub const OFFICE_COLUMN: &str = "Office";
pub const LICENSES_COLUMN: &str = "Licenses";

/// One person as listed by a source export, projected to the three columns
/// the tally cares about. An empty `office` means no office is assigned.
///
/// Field order is the column order of the combined output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PersonRecord {
    pub display_name: String,
    pub office: String,
    pub licenses: String,
}

impl PersonRecord {
    pub fn new(
        display_name: impl Into<String>,
        office: impl Into<String>,
        licenses: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            office: office.into(),
            licenses: licenses.into(),
        }
    }

    /// Whether the record lacks an office assignment
    pub fn is_missing_office(&self) -> bool {
        self.office.is_empty()
    }
}

/// A source export exactly as read: every column, every row
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// File name the table was read from, used in diagnostics
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| PipelineError::MalformedInput {
                file: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Keep only the display name, office and licenses columns.
    ///
    /// Header names are matched exactly. Cells missing from a short row are
    /// read as empty.
    pub fn project(&self) -> Result<Vec<PersonRecord>> {
        let name_idx = self.column_index(DISPLAY_NAME_COLUMN)?;
        let office_idx = self.column_index(OFFICE_COLUMN)?;
        let licenses_idx = self.column_index(LICENSES_COLUMN)?;

        let cell = |row: &[String], idx: usize| row.get(idx).cloned().unwrap_or_default();

        Ok(self
            .rows
            .iter()
            .map(|row| PersonRecord {
                display_name: cell(row, name_idx),
                office: cell(row, office_idx),
                licenses: cell(row, licenses_idx),
            })
            .collect())
    }
}

/// The merged, deduplicated and cleaned record set across all sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedTable {
    pub records: Vec<PersonRecord>,
}

impl CombinedTable {
    pub fn new(records: Vec<PersonRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PersonRecord> {
        self.records.iter()
    }
}
