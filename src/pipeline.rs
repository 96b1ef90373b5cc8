use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::cleaning::LicenseNormalizer;
use crate::error::{PipelineError, Result};
use crate::io::{discover_inputs, read_table, write_json};
use crate::models::{CombinedTable, OfficeLicenseTotal, RawTable};
use crate::stages::{aggregate, aggregate_by_person, collect_records, merge, write_outputs};

/// How the combined table is built from the source tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationStrategy {
    /// One row per distinct source row, exact duplicates removed
    #[default]
    PerRow,
    /// One row per display name, offices and licenses unioned
    PerPerson,
}

/// Configuration for a tally run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for CSV exports; outputs are written here too
    pub input_dir: PathBuf,
    /// File name of the combined output
    pub combined_output: String,
    /// File name of the office totals output
    pub totals_output: String,
    pub strategy: AggregationStrategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            combined_output: "combined_output.csv".to_string(),
            totals_output: "office_totals.csv".to_string(),
            strategy: AggregationStrategy::PerRow,
        }
    }
}

impl PipelineConfig {
    /// Output file names, which are never read as inputs
    pub fn reserved_names(&self) -> [&str; 2] {
        [self.combined_output.as_str(), self.totals_output.as_str()]
    }

    pub fn combined_path(&self) -> PathBuf {
        self.input_dir.join(&self.combined_output)
    }

    pub fn totals_path(&self) -> PathBuf {
        self.input_dir.join(&self.totals_output)
    }
}

/// Everything computed in memory for one run
#[derive(Debug)]
pub struct Tally {
    pub combined: CombinedTable,
    pub totals: Vec<OfficeLicenseTotal>,
    pub rows_read: usize,
    pub duplicates_removed: usize,
    /// License tokens removed for not being whitelisted
    pub licenses_dropped: usize,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub files_processed: usize,
    pub input_files: Vec<String>,
    pub strategy: AggregationStrategy,
    pub rows_read: usize,
    pub duplicates_removed: usize,
    pub licenses_dropped: usize,
    pub combined_rows: usize,
    pub totals_rows: usize,
    pub combined_path: PathBuf,
    pub totals_path: PathBuf,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Build the combined and totals tables from already-loaded source tables
pub fn tally(tables: &[RawTable], strategy: AggregationStrategy) -> Result<Tally> {
    let normalizer = LicenseNormalizer::new();

    let (combined, rows_read, duplicates_removed, licenses_dropped) = match strategy {
        AggregationStrategy::PerRow => {
            let merged = merge(tables, &normalizer)?;
            (
                merged.combined,
                merged.rows_read,
                merged.duplicates_removed,
                merged.licenses_dropped,
            )
        }
        AggregationStrategy::PerPerson => {
            let records = collect_records(tables)?;
            let licenses_dropped: usize = records
                .iter()
                .map(|r| normalizer.split(&r.licenses).dropped.len())
                .sum();
            if licenses_dropped > 0 {
                warn!(
                    "{} license tokens dropped for not being whitelisted",
                    licenses_dropped
                );
            }
            let combined = aggregate_by_person(&records, &normalizer);
            (combined, records.len(), 0, licenses_dropped)
        }
    };

    let totals = aggregate(&combined);

    Ok(Tally {
        combined,
        totals,
        rows_read,
        duplicates_removed,
        licenses_dropped,
    })
}

/// Discover and read every eligible input table
pub fn load_inputs(config: &PipelineConfig) -> Result<Vec<RawTable>> {
    let inputs = discover_inputs(&config.input_dir, &config.reserved_names())?;
    if inputs.is_empty() {
        return Err(PipelineError::NoInputFound {
            dir: config.input_dir.clone(),
        });
    }

    info!("Found {} input files in {:?}", inputs.len(), config.input_dir);
    inputs.iter().map(|path| read_table(path)).collect()
}

/// Compute the tally without writing anything
pub fn analyze(config: &PipelineConfig) -> Result<(Vec<RawTable>, Tally)> {
    let tables = load_inputs(config)?;
    let tally = tally(&tables, config.strategy)?;
    Ok((tables, tally))
}

/// Run the whole pipeline: read, merge, aggregate, then write both outputs.
///
/// Outputs are only touched once every table has been read and validated.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let (tables, tally) = analyze(config)?;

    let rendered = write_outputs(
        &tally.combined,
        &tally.totals,
        &config.combined_path(),
        &config.totals_path(),
    )?;

    Ok(RunSummary {
        files_processed: tables.len(),
        input_files: tables.iter().map(|t| t.name.clone()).collect(),
        strategy: config.strategy,
        rows_read: tally.rows_read,
        duplicates_removed: tally.duplicates_removed,
        licenses_dropped: tally.licenses_dropped,
        combined_rows: tally.combined.len(),
        totals_rows: tally.totals.len(),
        combined_path: rendered.combined_path,
        totals_path: rendered.totals_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PersonRecord;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> PipelineConfig {
        PipelineConfig {
            input_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_example_scenario() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            dir.path().join("a.csv"),
            "Display name,Office,Licenses\nAlice,NY,Power BI Pro+Teams\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.csv"),
            "Display name,Office,Licenses\nBob,NY,Visio Plan 2\nAlice,NY,Power BI Pro+Teams\n",
        )
        .unwrap();

        let config = config_for(&dir);
        let summary = run(&config).unwrap();

        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.input_files, vec!["a.csv", "b.csv"]);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(
            fs::read_to_string(config.combined_path()).unwrap(),
            "Display name,Office,Licenses\nAlice,NY,Power BI Pro\nBob,NY,Visio Plan 2\n"
        );
        assert_eq!(
            fs::read_to_string(config.totals_path()).unwrap(),
            "Office,Licenses,Totals\nNY,Power BI Pro,1\nNY,Visio Plan 2,1\n"
        );
    }

    #[test]
    fn test_rerun_ignores_previous_outputs() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            dir.path().join("a.csv"),
            "Display name,Office,Licenses\nAlice,NY,Power BI Pro\n",
        )
        .unwrap();

        let config = config_for(&dir);
        let first = run(&config).unwrap();
        let totals_before = fs::read_to_string(config.totals_path()).unwrap();
        let second = run(&config).unwrap();

        assert_eq!(first.files_processed, 1);
        assert_eq!(second.files_processed, 1);
        assert_eq!(fs::read_to_string(config.totals_path()).unwrap(), totals_before);
    }

    #[test]
    fn test_missing_office_writes_nothing() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            dir.path().join("a.csv"),
            "Display name,Office,Licenses\nCarol,,Power BI Pro\n",
        )
        .unwrap();
        let config = config_for(&dir);
        fs::write(config.totals_path(), "previous").unwrap();

        match run(&config) {
            Err(PipelineError::MissingOfficeAssignment { display_names, .. }) => {
                assert_eq!(display_names, vec!["Carol"]);
            }
            other => panic!("expected MissingOfficeAssignment, got {:?}", other),
        }

        assert!(!config.combined_path().exists());
        assert_eq!(fs::read_to_string(config.totals_path()).unwrap(), "previous");
    }

    #[test]
    fn test_no_inputs() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = config_for(&dir);
        fs::write(config.totals_path(), "Office,Licenses,Totals\n").unwrap();

        assert!(matches!(run(&config), Err(PipelineError::NoInputFound { .. })));
    }

    #[test]
    fn test_per_person_strategy() {
        let tables = vec![
            crate::io::parse_table_str(
                "a.csv",
                "Display name,Office,Licenses\nAlice,NY,Power BI Pro\n",
            )
            .unwrap(),
            crate::io::parse_table_str(
                "b.csv",
                "Office,Display name,Licenses\nLA,Alice,Visio Plan 2\nNY,Bob,Visio Plan 2\n",
            )
            .unwrap(),
        ];

        let tally = tally(&tables, AggregationStrategy::PerPerson).unwrap();

        assert_eq!(
            tally.combined.records,
            vec![
                PersonRecord::new("Alice", "LA+NY", "Power BI Pro+Visio Plan 2"),
                PersonRecord::new("Bob", "NY", "Visio Plan 2"),
            ]
        );
        assert_eq!(tally.rows_read, 3);
        assert_eq!(tally.licenses_dropped, 0);
        assert_eq!(
            tally.totals,
            vec![
                OfficeLicenseTotal::new("LA+NY", "Power BI Pro", 1),
                OfficeLicenseTotal::new("LA+NY", "Visio Plan 2", 1),
                OfficeLicenseTotal::new("NY", "Visio Plan 2", 1),
            ]
        );
    }

    #[test]
    fn test_summary_json() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(
            dir.path().join("a.csv"),
            "Display name,Office,Licenses\nAlice,NY,Power BI Pro+Teams+Exchange\n",
        )
        .unwrap();
        let summary = run(&config_for(&dir)).unwrap();

        let out = TempDir::new().expect("Failed to create temp dir");
        let path = out.path().join("summary.json");
        summary.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["files_processed"], 1);
        assert_eq!(value["strategy"], "per-row");
        assert_eq!(value["totals_rows"], 1);
        assert_eq!(value["licenses_dropped"], 2);
    }
}
