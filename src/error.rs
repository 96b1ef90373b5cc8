use std::path::PathBuf;

/// Errors that abort a tally run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("no CSV input files found in {}", dir.display())]
    NoInputFound { dir: PathBuf },

    #[error("{file}: {} user(s) have no office assigned", display_names.len())]
    MissingOfficeAssignment {
        file: String,
        display_names: Vec<String>,
    },

    #[error("{file}: missing required column {column:?}")]
    MalformedInput { file: String, column: String },

    #[error("failed to read CSV from {file}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to persist {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    #[error("invalid input pattern")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to write run summary")]
    Summary(#[from] serde_json::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
