use std::path::PathBuf;
use thiserror::Error;

/// Raised when a relative (ppm) tolerance is evaluated against a reference
/// mass that cannot anchor it.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ToleranceError {
    #[error("PPM tolerance requires a positive, finite reference mass (got {reference})")]
    InvalidTolerance { reference: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameters {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("The modification database is empty, refusing to run")]
    EmptyDatabase,
    #[error("Analysis cancelled after {processed} spectra")]
    Cancelled { processed: usize },
}

#[derive(Error, Debug)]
pub enum MgfError {
    #[error("Unable to open peak list {path:?}: {source}")]
    FileOpen {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("I/O error while reading peak list: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unreadable peak list: {0}")]
    Parse(#[source] mzdata::io::MGFError),
    #[error("Malformed header in spectrum {spectrum}: {msg}")]
    MalformedHeader { spectrum: String, msg: String },
    #[error("Spectrum {spectrum} has no PEPMASS")]
    MissingPrecursorMass { spectrum: String },
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Unable to open modification database {path:?}: {source}")]
    FileOpen {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("Error reading modification database: {0}")]
    Csv(#[from] csv::Error),
    #[error(
        "Expected exactly the columns `Short Name`, `[M+H]+` and `Product ions`, found {found:?}"
    )]
    InvalidColumns { found: Vec<String> },
    #[error("Modification {name} has a non-finite precursor mass ({value})")]
    InvalidMass { name: String, value: f64 },
    #[error("Modification {name} lists an unreadable product ion {token:?}")]
    InvalidProductIon { name: String, token: String },
    #[error("Modification {name} is defined more than once")]
    DuplicateModification { name: String },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Unable to write {path:?}: {source}")]
    FileCreate {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("I/O error while writing results: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error writing delimited results: {0}")]
    Csv(#[from] csv::Error),
    #[error("Error writing run summary: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Error writing spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Error, Debug)]
pub enum NucleoseekError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Tolerance(#[from] ToleranceError),
    #[error(transparent)]
    SpectraReading(#[from] MgfError),
    #[error(transparent)]
    DatabaseReading(#[from] DatabaseError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type Result<T> = std::result::Result<T, NucleoseekError>;
