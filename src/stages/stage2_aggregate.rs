use std::collections::BTreeMap;

use tracing::info;

use crate::models::{CombinedTable, LICENSE_DELIMITER, OfficeLicenseTotal};

/// Execute Stage 2: count licenses per office
///
/// Every cleaned license cell is exploded into one contribution per
/// (office, license) pair. Contributions are summed and returned sorted by
/// office, then license.
pub fn aggregate(combined: &CombinedTable) -> Vec<OfficeLicenseTotal> {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();

    for record in combined.iter() {
        for license in record
            .licenses
            .split(LICENSE_DELIMITER)
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            *counts.entry((record.office.as_str(), license)).or_insert(0) += 1;
        }
    }

    let totals: Vec<OfficeLicenseTotal> = counts
        .into_iter()
        .map(|((office, license), total)| OfficeLicenseTotal::new(office, license, total))
        .collect();

    info!("Aggregated {} office/license totals", totals.len());
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonRecord;

    #[test]
    fn test_aggregate_example_scenario() {
        let combined = CombinedTable::new(vec![
            PersonRecord::new("Alice", "NY", "Power BI Pro"),
            PersonRecord::new("Bob", "NY", "Visio Plan 2"),
        ]);

        assert_eq!(
            aggregate(&combined),
            vec![
                OfficeLicenseTotal::new("NY", "Power BI Pro", 1),
                OfficeLicenseTotal::new("NY", "Visio Plan 2", 1),
            ]
        );
    }

    #[test]
    fn test_aggregate_sorts_and_sums() {
        let combined = CombinedTable::new(vec![
            PersonRecord::new("Zed", "Seattle", "Visio Plan 2+Power BI Pro"),
            PersonRecord::new("Amy", "Austin", "Power BI Pro"),
            PersonRecord::new("Bea", "Seattle", "Power BI Pro"),
            PersonRecord::new("Cy", "Seattle", ""),
        ]);

        assert_eq!(
            aggregate(&combined),
            vec![
                OfficeLicenseTotal::new("Austin", "Power BI Pro", 1),
                OfficeLicenseTotal::new("Seattle", "Power BI Pro", 2),
                OfficeLicenseTotal::new("Seattle", "Visio Plan 2", 1),
            ]
        );
    }

    #[test]
    fn test_duplicates_within_cell_count_twice() {
        let combined = CombinedTable::new(vec![PersonRecord::new(
            "Alice",
            "NY",
            "Power BI Pro+Power BI Pro",
        )]);

        assert_eq!(
            aggregate(&combined),
            vec![OfficeLicenseTotal::new("NY", "Power BI Pro", 2)]
        );
    }

    #[test]
    fn test_totals_match_exploded_rows() {
        let combined = CombinedTable::new(vec![
            PersonRecord::new("A", "NY", "Power BI Pro+Visio Plan 2"),
            PersonRecord::new("B", "NY", "Visio Plan 2"),
            PersonRecord::new("C", "LA", "Power BI Premium Per User+Visio Plan 2"),
            PersonRecord::new("D", "LA", ""),
        ]);

        let totals = aggregate(&combined);
        for total in &totals {
            let expected = combined
                .iter()
                .filter(|r| r.office == total.office)
                .flat_map(|r| r.licenses.split('+'))
                .filter(|l| *l == total.license)
                .count() as u64;
            assert_eq!(total.total, expected, "{:?}", total);
            assert!(total.total >= 1);
        }
        let sum: u64 = totals.iter().map(|t| t.total).sum();
        assert_eq!(sum, 5);
    }

    #[test]
    fn test_no_licenses_gives_empty_totals() {
        let combined = CombinedTable::new(vec![PersonRecord::new("Alice", "NY", "")]);
        assert!(aggregate(&combined).is_empty());
        assert!(aggregate(&CombinedTable::default()).is_empty());
    }
}
