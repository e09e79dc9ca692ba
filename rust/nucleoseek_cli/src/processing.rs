use indicatif::{
    ProgressIterator,
    ProgressStyle,
};
use nucleoseek::data_sources::{
    read_database_files,
    read_mgf_file,
};
use nucleoseek::output::{
    RunSummary,
    summary_path_for,
    write_identifications_file,
    write_summary_file,
};
use nucleoseek::{
    AnalysisEngine,
    AnalysisOutput,
    AnalysisParameters,
    CandidateBatch,
    MergePolicy,
    NucleoseekError,
    Spectrum,
    order_by_retention_time,
};
use std::path::{
    Path,
    PathBuf,
};
use std::time::Instant;
use tracing::{
    debug,
    info,
};

use crate::errors::CliError;

/// Matches the spectra chunk by chunk under a progress bar.
pub fn main_loop(
    spectra: &[Spectrum],
    engine: &AnalysisEngine<'_>,
    chunk_size: usize,
) -> Result<AnalysisOutput, CliError> {
    let start = Instant::now();
    let ordered = order_by_retention_time(spectra);

    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| CliError::Config { msg: e.to_string() })?;

    let mut batch = CandidateBatch::default();
    let mut chunk_num = 0;
    for chunk in ordered.chunks(chunk_size).progress_with_style(style) {
        let chunk_batch = engine
            .generate_candidates(chunk)
            .map_err(NucleoseekError::from)?;
        debug!(
            "Chunk {} accepted {} candidates",
            chunk_num,
            chunk_batch.len()
        );
        batch.extend(chunk_batch);
        chunk_num += 1;
    }

    let output = engine.finalize(batch);
    println!(
        "Finished processing {} spectra in {} chunks in {:?}",
        output.stats.spectra_processed,
        chunk_num,
        start.elapsed()
    );
    Ok(output)
}

pub fn process_mgf(
    spectra_file: &Path,
    database_files: &[PathBuf],
    merge_policy: MergePolicy,
    parameters: AnalysisParameters,
    chunk_size: usize,
    output_file: &Path,
) -> Result<(), CliError> {
    let st = Instant::now();
    let database =
        read_database_files(database_files, merge_policy).map_err(NucleoseekError::from)?;
    let spectra = read_mgf_file(spectra_file).map_err(NucleoseekError::from)?;
    info!(
        "Loading {} spectra and {} modifications took: {:?}",
        spectra.len(),
        database.len(),
        st.elapsed()
    );

    let engine =
        AnalysisEngine::new(&database, parameters).map_err(NucleoseekError::from)?;
    let output = main_loop(&spectra, &engine, chunk_size)?;

    if let Some(parent) = output_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_identifications_file(output_file, &output.identifications)
        .map_err(NucleoseekError::from)?;
    let summary = RunSummary::new(
        Some(spectra_file.to_path_buf()),
        database_files.to_vec(),
        parameters,
        &output,
    );
    write_summary_file(summary_path_for(output_file), &summary)
        .map_err(NucleoseekError::from)?;

    println!(
        "Found {} identifications, {} candidates filtered out, {} duplicates removed",
        output.identifications.len(),
        output.filtered_count,
        output.stats.duplicates_removed
    );
    Ok(())
}
