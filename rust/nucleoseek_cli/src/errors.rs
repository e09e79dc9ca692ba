use nucleoseek::NucleoseekError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Error interpreting the config: {msg}")]
    Config { msg: String },

    #[error("Error parsing config: {msg}")]
    ParseError { msg: String },

    #[error("Error reading file {path:?}: {source}")]
    FileOpen {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Nucleoseek(#[from] NucleoseekError),
}
