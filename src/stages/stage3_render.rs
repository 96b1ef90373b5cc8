use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::io::AtomicCsvWriter;
use crate::models::{
    CombinedTable, DISPLAY_NAME_COLUMN, LICENSES_COLUMN, OFFICE_COLUMN, OfficeLicenseTotal,
};

pub const TOTALS_COLUMN: &str = "Totals";

/// Result of Stage 3 rendering
#[derive(Debug)]
pub struct RenderResult {
    pub combined_path: PathBuf,
    pub totals_path: PathBuf,
}

/// Execute Stage 3: write both output tables
///
/// Both files are fully written to temporary files before either
/// destination is replaced. Headers are written even for empty tables.
pub fn write_outputs(
    combined: &CombinedTable,
    totals: &[OfficeLicenseTotal],
    combined_path: &Path,
    totals_path: &Path,
) -> Result<RenderResult> {
    let mut combined_writer = AtomicCsvWriter::new(
        combined_path,
        &[DISPLAY_NAME_COLUMN, OFFICE_COLUMN, LICENSES_COLUMN],
    )?;
    for record in combined.iter() {
        combined_writer.write_row(record)?;
    }

    let mut totals_writer =
        AtomicCsvWriter::new(totals_path, &[OFFICE_COLUMN, LICENSES_COLUMN, TOTALS_COLUMN])?;
    for total in totals {
        totals_writer.write_row(total)?;
    }

    info!("Writing {} combined rows to {:?}", combined.len(), combined_path);
    let combined_path = combined_writer.finish()?;
    info!("Writing {} office totals to {:?}", totals.len(), totals_path);
    let totals_path = totals_writer.finish()?;

    Ok(RenderResult {
        combined_path,
        totals_path,
    })
}
