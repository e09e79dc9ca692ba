mod cli;
mod commands;
mod config;
mod errors;
mod processing;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::{
    Args,
    Commands,
};
use crate::commands::{
    main_run,
    main_write_template,
};
use crate::errors::CliError;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    let args = Args::parse();

    match args.command {
        Some(Commands::Run(args)) => main_run(args)?,
        Some(Commands::WriteTemplate(args)) => main_write_template(args)?,
        None => {
            println!("No command provided");
        }
    }
    Ok(())
}
