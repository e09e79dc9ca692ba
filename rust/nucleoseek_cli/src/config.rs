use nucleoseek::{
    AnalysisParameters,
    MergePolicy,
    ToleranceKind,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::cli::RunArgs;
use crate::errors::CliError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    pub analysis: AnalysisConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub spectra_file: Option<PathBuf>,
    pub database_files: Vec<PathBuf>,
    pub merge_policy: MergePolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub chunk_size: usize,
    pub parameters: AnalysisParameters,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    pub file: PathBuf,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let conf = std::fs::File::open(path).map_err(|source| CliError::FileOpen {
            source,
            path: path.to_path_buf(),
        })?;
        serde_json::from_reader(conf).map_err(|e| CliError::ParseError { msg: e.to_string() })
    }

    /// Applies the command line overrides and checks that the run is complete.
    pub fn with_cli_args(mut self, args: &RunArgs) -> Result<Self, CliError> {
        if let Some(spectra_file) = &args.spectra_file {
            self.input.spectra_file = Some(spectra_file.clone());
        }
        if !args.database_files.is_empty() {
            self.input.database_files = args.database_files.clone();
        }
        if let Some(file) = &args.output_file {
            self.output = Some(OutputConfig { file: file.clone() });
        }
        if let Some(chunk_size) = args.chunk_size {
            self.analysis.chunk_size = chunk_size;
        }

        if self.input.spectra_file.is_none() {
            return Err(CliError::Config {
                msg: "No spectra provided, please provide one in either the config file or with the --spectra-file flag".to_string(),
            });
        }
        if self.input.database_files.is_empty() {
            return Err(CliError::Config {
                msg: "No modification database provided, please provide one in either the config file or with the --database-file flag".to_string(),
            });
        }
        if self.output.is_none() {
            return Err(CliError::Config {
                msg: "No output file provided, please provide one in either the config file or with the --output-file flag".to_string(),
            });
        }
        if self.analysis.chunk_size == 0 {
            return Err(CliError::Config {
                msg: "chunk_size must be at least 1".to_string(),
            });
        }
        Ok(self)
    }

    /// Starting point written by `write-template`.
    pub fn template() -> Self {
        Self {
            input: InputConfig {
                spectra_file: Some(PathBuf::from("spectra.mgf")),
                database_files: vec![PathBuf::from("modifications.csv")],
                merge_policy: MergePolicy::KeepFirst,
            },
            analysis: AnalysisConfig {
                chunk_size: 1000,
                parameters: AnalysisParameters {
                    ms_tolerance: 0.02,
                    ms_tolerance_type: ToleranceKind::Absolute,
                    ms_ms_tolerance: 0.5,
                    ms_ms_tolerance_type: ToleranceKind::Absolute,
                    ms_ms_score_threshold: 20.0,
                    ms_ms_intensity_threshold: 0.0,
                    exclusion_time_seconds: 60.0,
                },
            },
            output: Some(OutputConfig {
                file: PathBuf::from("identifications.tsv"),
            }),
        }
    }
}
