use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match an MGF peak list against modification databases.
    Run(RunArgs),
    /// Write a template configuration file.
    WriteTemplate(WriteTemplateArgs),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the MGF file (will over-write the config file)
    #[arg(short, long)]
    pub spectra_file: Option<PathBuf>,

    /// Modification database CSV, can be repeated (will over-write the config file)
    #[arg(short, long = "database-file")]
    pub database_files: Vec<PathBuf>,

    /// Path to the results table, `.tsv`/`.txt` are tab separated
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    /// Number of spectra matched per progress step
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The directory to write the template to.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
