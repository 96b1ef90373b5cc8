use std::io::Read;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::models::RawTable;

const UTF8_BOM: char = '\u{feff}';

/// Find the CSV exports directly inside `dir`, sorted by path.
///
/// Files whose name is in `reserved` (the tool's own outputs) are skipped.
pub fn discover_inputs(dir: &Path, reserved: &[&str]) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.csv", Pattern::escape(&dir.display().to_string()));

    let mut inputs: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| {
            let reserved_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| reserved.contains(&n));
            if reserved_name {
                debug!("Skipping reserved output file {:?}", path);
            }
            !reserved_name
        })
        .collect();

    inputs.sort();
    Ok(inputs)
}

/// Read a CSV export from disk
pub fn read_table(path: &Path) -> Result<RawTable> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let file = std::fs::File::open(path)?;
    parse_table(&name, file)
}

/// Parse CSV text into a table
pub fn parse_table_str(name: &str, content: &str) -> Result<RawTable> {
    parse_table(name, content.as_bytes())
}

/// Parse CSV from any reader. The first row is the header row.
///
/// Rows may be shorter than the header; missing trailing cells are filled in
/// as empty by `RawTable::project`.
pub fn parse_table<R: Read>(name: &str, reader: R) -> Result<RawTable> {
    let csv_error = |source: csv::Error| PipelineError::Csv {
        file: name.to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if let Some(first) = headers.first_mut() {
        if first.starts_with(UTF8_BOM) {
            *first = first.trim_start_matches(UTF8_BOM).to_string();
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(name, headers, rows))
}
