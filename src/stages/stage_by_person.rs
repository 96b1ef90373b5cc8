use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::cleaning::LicenseNormalizer;
use crate::error::Result;
use crate::models::{CombinedTable, LICENSE_DELIMITER, PersonRecord, RawTable};

/// Group records by exact display name, one output row per person.
///
/// Offices and license tokens are unioned across the person's rows, sorted
/// and joined with `+`. Empty offices are ignored. The unioned license list
/// is then cleaned against the whitelist. Output is ordered by display name.
pub fn aggregate_by_person<'a, I>(records: I, normalizer: &LicenseNormalizer) -> CombinedTable
where
    I: IntoIterator<Item = &'a PersonRecord>,
{
    let mut people: BTreeMap<&str, (BTreeSet<&str>, BTreeSet<&str>)> = BTreeMap::new();

    for record in records {
        let (offices, licenses) = people.entry(record.display_name.as_str()).or_default();

        if !record.office.is_empty() {
            offices.insert(record.office.as_str());
        }
        licenses.extend(
            record
                .licenses
                .split(LICENSE_DELIMITER)
                .map(str::trim)
                .filter(|l| !l.is_empty()),
        );
    }

    let records: Vec<PersonRecord> = people
        .into_iter()
        .map(|(name, (offices, licenses))| {
            let offices: Vec<&str> = offices.into_iter().collect();
            let licenses: Vec<&str> = licenses.into_iter().collect();
            PersonRecord::new(
                name,
                offices.join(LICENSE_DELIMITER),
                normalizer.clean(&licenses.join(LICENSE_DELIMITER)),
            )
        })
        .collect();

    info!("Grouped records into {} people", records.len());
    CombinedTable::new(records)
}

/// Per-person view of a single raw table
pub fn aggregate_table_by_person(
    raw: &RawTable,
    normalizer: &LicenseNormalizer,
) -> Result<CombinedTable> {
    let records = raw.project()?;
    Ok(aggregate_by_person(&records, normalizer))
}
