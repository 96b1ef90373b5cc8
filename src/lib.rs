pub mod cleaning;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use cleaning::LicenseNormalizer;
pub use error::PipelineError;
pub use io::{AtomicCsvWriter, discover_inputs, parse_table_str, read_table};
pub use models::{CombinedTable, LicenseToken, OfficeLicenseTotal, PersonRecord, RawTable};
pub use pipeline::{AggregationStrategy, PipelineConfig, RunSummary, Tally, analyze, run, tally};
pub use stages::{
    aggregate, aggregate_by_person, aggregate_table_by_person, merge, validate_offices,
    write_outputs,
};
