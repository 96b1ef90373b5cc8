use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::cleaning::LicenseNormalizer;
use crate::error::Result;
use crate::models::{CombinedTable, PersonRecord, RawTable};

use super::validate_offices;

/// Result of Stage 1 merging
#[derive(Debug)]
pub struct MergeResult {
    /// The merged, deduplicated and cleaned records
    pub combined: CombinedTable,
    /// Number of input tables merged
    pub tables_processed: usize,
    /// Rows read across all tables
    pub rows_read: usize,
    /// Exact duplicate rows removed
    pub duplicates_removed: usize,
    /// License tokens dropped for not being whitelisted
    pub licenses_dropped: usize,
}

/// Project and validate every table, failing on the first table with a
/// missing office. Records come back in table-then-row order.
pub fn collect_records(tables: &[RawTable]) -> Result<Vec<PersonRecord>> {
    let mut records = Vec::new();

    for table in tables {
        info!("Processing {}...", table.name);
        let projected = table.project()?;
        validate_offices(&table.name, &projected)?;
        debug!("{}: {} rows", table.name, projected.len());
        records.extend(projected);
    }

    Ok(records)
}

/// Execute Stage 1: merge all source tables into one combined table
///
/// This stage:
/// 1. Projects each table to display name, office and licenses
/// 2. Validates that every person has an office (fatal otherwise)
/// 3. Drops exact duplicate rows, keeping the first occurrence
/// 4. Cleans each surviving license cell against the whitelist
///
/// Deduplication compares the raw license cells, before cleaning.
pub fn merge(tables: &[RawTable], normalizer: &LicenseNormalizer) -> Result<MergeResult> {
    let records = collect_records(tables)?;
    let rows_read = records.len();

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.clone()) {
            unique.push(record);
        }
    }
    let duplicates_removed = rows_read - unique.len();

    let mut licenses_dropped = 0;
    for record in &mut unique {
        let cleaned = normalizer.split(&record.licenses);
        if !cleaned.dropped.is_empty() {
            debug!("{}: dropping {:?}", record.display_name, cleaned.dropped);
        }
        licenses_dropped += cleaned.dropped.len();
        record.licenses = cleaned.joined();
    }

    info!(
        "Merged {} tables: {} rows read, {} duplicates removed, {} records kept",
        tables.len(),
        rows_read,
        duplicates_removed,
        unique.len()
    );
    if licenses_dropped > 0 {
        warn!(
            "{} license tokens dropped for not being whitelisted",
            licenses_dropped
        );
    }

    Ok(MergeResult {
        combined: CombinedTable::new(unique),
        tables_processed: tables.len(),
        rows_read,
        duplicates_removed,
        licenses_dropped,
    })
}
