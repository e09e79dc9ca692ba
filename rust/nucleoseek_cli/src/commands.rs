use tracing::{
    info,
    instrument,
};

use crate::cli::{
    RunArgs,
    WriteTemplateArgs,
};
use crate::config::Config;
use crate::errors::CliError;
use crate::processing::process_mgf;

const TEMPLATE_FILE_NAME: &str = "nucleoseek_config_template.json";

/// Main function for the 'run' subcommand.
#[instrument]
pub fn main_run(args: RunArgs) -> Result<(), CliError> {
    let config = Config::from_file(&args.config)?.with_cli_args(&args)?;
    info!("Parsed configuration: {:#?}", config);

    let (Some(spectra_file), Some(output)) = (&config.input.spectra_file, &config.output) else {
        return Err(CliError::Config {
            msg: "No input or output specified".to_string(),
        });
    };

    process_mgf(
        spectra_file,
        &config.input.database_files,
        config.input.merge_policy,
        config.analysis.parameters,
        config.analysis.chunk_size,
        &output.file,
    )
}

pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let target_dir = args.output_path;
    std::fs::create_dir_all(&target_dir)?;

    let template_path = target_dir.join(TEMPLATE_FILE_NAME);
    std::fs::write(
        &template_path,
        serde_json::to_string_pretty(&Config::template())?,
    )?;
    println!("Wrote config template to: {}", template_path.display());
    Ok(())
}
