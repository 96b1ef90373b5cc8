use tracing::error;

use crate::error::{PipelineError, Result};
use crate::models::PersonRecord;

/// Display names of every record without an office, in row order
pub fn find_missing_offices(records: &[PersonRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| r.is_missing_office())
        .map(|r| r.display_name.clone())
        .collect()
}

/// Stage 0: refuse a table that has people without an office.
///
/// This is a hard stop for the whole run; rows are never skipped.
pub fn validate_offices(file: &str, records: &[PersonRecord]) -> Result<()> {
    let display_names = find_missing_offices(records);
    if display_names.is_empty() {
        return Ok(());
    }

    error!(
        "{}: {} user(s) have no office assigned",
        file,
        display_names.len()
    );
    Err(PipelineError::MissingOfficeAssignment {
        file: file.to_string(),
        display_names,
    })
}
