//! Matching engine.
//!
//! Spectra are matched against every database entry in parallel, one
//! [`ScoringBuffer`] per rayon worker. Candidate generation can be fed in
//! several chunks (e.g. to drive a progress bar); the partial batches are
//! then merged and deduplicated once in [`AnalysisEngine::finalize`].

use crate::errors::{
    AnalysisError,
    ToleranceError,
};
use crate::models::{
    AnalysisParameters,
    IdentificationRecord,
    ModificationDatabase,
    ModificationEntry,
    Spectrum,
};
use crate::scoring::{
    CandidateBatch,
    CandidateGenerator,
    EngineTimings,
    FilterCounts,
    ProductIonScorer,
    ScoringBuffer,
    deduplicate,
};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::time::Instant;
use tracing::{
    debug,
    info,
    warn,
};

/// Tally of what happened during a run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunStatistics {
    pub spectra_processed: usize,
    pub empty_spectra: usize,
    pub mass_mismatches: usize,
    pub below_score_threshold: usize,
    /// Pairs skipped because a tolerance could not be evaluated.
    pub invalid_tolerance: usize,
    pub accepted_candidates: usize,
    pub duplicates_removed: usize,
    pub skipped_database_entries: usize,
    pub timings: EngineTimings,
}

/// Final result of a run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// Deduplicated identifications, ordered by retention time.
    pub identifications: Vec<IdentificationRecord>,
    /// Candidates rejected on precursor mass or on score.
    pub filtered_count: usize,
    pub stats: RunStatistics,
}

pub struct AnalysisEngine<'db> {
    parameters: AnalysisParameters,
    generator: CandidateGenerator<'db>,
    skipped_entries: usize,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl<'db> AnalysisEngine<'db> {
    /// Validates the parameters and the database and prepares the entries.
    ///
    /// Entries whose masses cannot anchor a ppm tolerance are left out of the
    /// run and logged.
    pub fn new(
        database: &'db ModificationDatabase,
        parameters: AnalysisParameters,
    ) -> Result<Self, AnalysisError> {
        parameters.validate()?;
        if database.is_empty() {
            return Err(AnalysisError::EmptyDatabase);
        }

        let precursor_tolerance = parameters.precursor_tolerance();
        let scorer = ProductIonScorer::new(
            parameters.product_ion_tolerance(),
            parameters.ms_ms_intensity_threshold,
        );

        let mut skipped_entries = 0;
        let entries: Vec<&'db ModificationEntry> = database
            .iter()
            .filter(|entry| match check_entry(entry, &parameters) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping modification {}: {}", entry.name, e);
                    skipped_entries += 1;
                    false
                }
            })
            .collect();

        if entries.is_empty() {
            warn!(
                "All {} database entries were skipped, no identifications are possible",
                database.len()
            );
        }
        debug!(
            "Engine ready with {} of {} entries, precursor tolerance {}, product ion tolerance {}",
            entries.len(),
            database.len(),
            precursor_tolerance,
            scorer.tolerance
        );

        Ok(Self {
            parameters,
            generator: CandidateGenerator::new(
                entries,
                precursor_tolerance,
                scorer,
                parameters.ms_ms_score_threshold,
            ),
            skipped_entries,
            cancel_flag: None,
        })
    }

    /// Flag polled between spectra; setting it aborts the run.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    pub fn parameters(&self) -> &AnalysisParameters {
        &self.parameters
    }

    pub fn num_entries(&self) -> usize {
        self.generator.num_entries()
    }

    pub fn skipped_entries(&self) -> usize {
        self.skipped_entries
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Matches a chunk of spectra against the database.
    ///
    /// Candidates come back in the order of `spectra`, then database order.
    pub fn generate_candidates<'a>(
        &self,
        spectra: &[&'a Spectrum],
    ) -> Result<CandidateBatch<'a>, AnalysisError>
    where
        'db: 'a,
    {
        let num_input_items = spectra.len();
        let start = Instant::now();

        let mut batch: CandidateBatch<'a> = spectra
            .par_iter()
            .map_init(ScoringBuffer::default, |buffer, &spectrum| {
                if self.is_cancelled() {
                    return (Vec::new(), FilterCounts::default());
                }
                self.generator.candidates_for(spectrum, buffer)
            })
            .collect();

        if self.is_cancelled() {
            return Err(AnalysisError::Cancelled {
                processed: batch.counts.spectra_processed,
            });
        }

        let elapsed = start.elapsed();
        batch.timings.candidate_generation += elapsed;
        if num_input_items > 0 {
            let throughput = num_input_items as f64 / elapsed.as_secs_f64();
            info!(
                "Matching {} spectra against {} entries took: {:?} \
                 throughput: {:#.1}/s, accepted: {}",
                num_input_items,
                self.generator.num_entries(),
                elapsed,
                throughput,
                batch.len()
            );
        }

        Ok(batch)
    }

    /// Orders the candidates by retention time, removes repeated detections
    /// and builds the report.
    pub fn finalize(&self, batch: CandidateBatch<'_>) -> AnalysisOutput {
        let CandidateBatch {
            mut candidates,
            counts,
            mut timings,
        } = batch;
        let accepted_candidates = candidates.len();

        let start = Instant::now();
        candidates.sort_by(|a, b| {
            a.retention_time_seconds()
                .total_cmp(&b.retention_time_seconds())
        });
        let (survivors, duplicates_removed) =
            deduplicate(candidates, self.parameters.exclusion_time_seconds);
        timings.deduplication += start.elapsed();

        let identifications: Vec<IdentificationRecord> =
            survivors.iter().map(IdentificationRecord::from).collect();

        info!(
            "Kept {} identifications out of {} accepted candidates ({} duplicates, {} filtered)",
            identifications.len(),
            accepted_candidates,
            duplicates_removed,
            counts.filtered()
        );
        info!("{:?}", timings);

        AnalysisOutput {
            identifications,
            filtered_count: counts.filtered(),
            stats: RunStatistics {
                spectra_processed: counts.spectra_processed,
                empty_spectra: counts.empty_spectra,
                mass_mismatches: counts.mass_mismatch,
                below_score_threshold: counts.below_score_threshold,
                invalid_tolerance: counts.invalid_tolerance,
                accepted_candidates,
                duplicates_removed,
                skipped_database_entries: self.skipped_entries,
                timings,
            },
        }
    }
}

fn check_entry(
    entry: &ModificationEntry,
    parameters: &AnalysisParameters,
) -> Result<(), ToleranceError> {
    parameters
        .precursor_tolerance()
        .half_width(entry.reference_mass)?;
    let product_ion_tolerance = parameters.product_ion_tolerance();
    for &ion in entry.reference_product_ions.iter() {
        product_ion_tolerance.half_width(ion)?;
    }
    Ok(())
}

/// Stable ordering of spectra by ascending retention time.
pub fn order_by_retention_time(spectra: &[Spectrum]) -> Vec<&Spectrum> {
    let mut ordered: Vec<&Spectrum> = spectra.iter().collect();
    ordered.sort_by(|a, b| {
        a.retention_time_seconds()
            .total_cmp(&b.retention_time_seconds())
    });
    ordered
}

/// Runs the whole analysis in one go.
pub fn find_modifications(
    spectra: &[Spectrum],
    database: &ModificationDatabase,
    parameters: &AnalysisParameters,
) -> Result<AnalysisOutput, AnalysisError> {
    let engine = AnalysisEngine::new(database, *parameters)?;
    let ordered = order_by_retention_time(spectra);
    let batch = engine.generate_candidates(&ordered)?;
    Ok(engine.finalize(batch))
}
