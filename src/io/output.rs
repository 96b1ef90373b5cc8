//! Atomic output writers.
//!
//! Outputs are written to a temporary file next to the destination and only
//! moved into place on `finish()`, so a failed run never leaves a
//! half-written artifact behind.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{PipelineError, Result};

/// A CSV writer that replaces its destination only when finished.
///
/// Dropping it without calling `finish()` deletes the temporary file.
pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl AtomicCsvWriter {
    /// Create a writer targeting `final_path` and write its header row
    pub fn new(final_path: impl AsRef<Path>, header: &[&str]) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let temp_file = NamedTempFile::new_in(parent_dir(&final_path))?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(temp_file));
        writer
            .write_record(header)
            .map_err(|source| csv_error(&final_path, source))?;

        Ok(Self { writer, final_path })
    }

    /// Append one data row; fields are written in declaration order
    pub fn write_row<T: Serialize>(&mut self, row: &T) -> Result<()> {
        self.writer
            .serialize(row)
            .map_err(|source| csv_error(&self.final_path, source))
    }

    /// Flush everything and atomically move the file into place
    pub fn finish(self) -> Result<PathBuf> {
        let buf_writer = self.writer.into_inner().map_err(|e| {
            PipelineError::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
        })?;
        let named_temp = buf_writer
            .into_inner()
            .map_err(|e| PipelineError::Io(e.into_error()))?;

        named_temp
            .persist(&self.final_path)
            .map_err(|source| PipelineError::Persist {
                path: self.final_path.clone(),
                source,
            })?;

        Ok(self.final_path)
    }
}

/// Write a value as pretty JSON, atomically
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut temp_file = NamedTempFile::new_in(parent_dir(path))?;
    serde_json::to_writer_pretty(&mut temp_file, value)?;
    temp_file
        .persist(path)
        .map_err(|source| PipelineError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Directory a temporary file must live in to be renamed onto `path`
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn csv_error(path: &Path, source: csv::Error) -> PipelineError {
    PipelineError::Csv {
        file: path.display().to_string(),
        source,
    }
}
