use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use license_tally::{AggregationStrategy, PipelineConfig, PipelineError, analyze, run};

/// Exit status when users without an office block the run
const EXIT_MISSING_OFFICE: u8 = 3;

#[derive(Parser)]
#[command(name = "license-tally")]
#[command(author, version, about = "Merge license exports and count licenses per office", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Directory containing the CSV exports
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// File name of the combined output (never read as input)
    #[arg(long, default_value = "combined_output.csv")]
    combined_output: String,

    /// File name of the office totals output (never read as input)
    #[arg(long, default_value = "office_totals.csv")]
    totals_output: String,

    /// How rows are combined before counting
    #[arg(long, value_enum, default_value_t = AggregationStrategy::PerRow)]
    strategy: AggregationStrategy,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl InputArgs {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            input_dir: self.dir.clone(),
            combined_output: self.combined_output.clone(),
            totals_output: self.totals_output.clone(),
            strategy: self.strategy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge all exports and write the combined and office totals files
    Process {
        #[command(flatten)]
        input: InputArgs,

        /// Also write a JSON run summary to this path
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Report what a run would produce without writing anything
    Analyze {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process { input, summary } => {
            setup_logging(input.verbose);
            process_exports(&input.config(), summary)
        }
        Commands::Analyze { input } => {
            setup_logging(input.verbose);
            analyze_exports(&input.config())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn report_failure(err: &anyhow::Error) -> ExitCode {
    if let Some(PipelineError::MissingOfficeAssignment {
        file,
        display_names,
    }) = err.downcast_ref::<PipelineError>()
    {
        eprintln!();
        eprintln!("ERROR: The following users in {} have no office assigned:", file);
        for name in display_names {
            eprintln!("- {}", name);
        }
        eprintln!();
        eprintln!("Please assign offices to these users and try again.");
        return ExitCode::from(EXIT_MISSING_OFFICE);
    }

    eprintln!("Error: {:#}", err);
    ExitCode::FAILURE
}

fn process_exports(config: &PipelineConfig, summary_path: Option<PathBuf>) -> Result<()> {
    info!("Scanning {:?} for license exports", config.input_dir);
    let summary = run(config)?;

    if let Some(path) = summary_path {
        summary
            .write_json(&path)
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
        info!("Run summary written to {:?}", path);
    }

    println!(
        "Processed {} files. Results saved to '{}'",
        summary.files_processed,
        summary.combined_path.display()
    );
    println!(
        "Office totals have been calculated and saved to '{}'",
        summary.totals_path.display()
    );

    Ok(())
}

fn analyze_exports(config: &PipelineConfig) -> Result<()> {
    let (tables, tally) = analyze(config)?;

    println!("License Export Analysis");
    println!("=======================");
    println!("Input files: {}", tables.len());
    for table in &tables {
        println!("  {} ({} rows)", table.name, table.len());
    }
    println!("Rows read: {}", tally.rows_read);
    println!("Duplicates removed: {}", tally.duplicates_removed);
    println!("License tokens dropped: {}", tally.licenses_dropped);
    println!("Combined rows: {}", tally.combined.len());
    println!();

    println!("Office Totals");
    println!("-------------");
    if tally.totals.is_empty() {
        println!("(no whitelisted licenses found)");
    }
    for total in &tally.totals {
        println!("{}: {} x{}", total.office, total.license, total.total);
    }

    Ok(())
}
