use super::accumulator::FilterCounts;
use super::scorer::{
    MatchScore,
    ProductIonScorer,
    ScoringBuffer,
};
use crate::models::{
    IdentificationRecord,
    ModificationEntry,
    Spectrum,
    Tolerance,
};
use tracing::debug;

/// A spectrum/modification pair that passed the mass and score filters.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub entry: &'a ModificationEntry,
    pub spectrum: &'a Spectrum,
    pub score: MatchScore,
}

impl Candidate<'_> {
    pub fn modification(&self) -> &str {
        &self.entry.name
    }

    pub fn retention_time_seconds(&self) -> f64 {
        self.spectrum.retention_time_seconds()
    }

    pub fn score_percent(&self) -> f64 {
        self.score.score_percent
    }
}

impl From<&Candidate<'_>> for IdentificationRecord {
    fn from(c: &Candidate<'_>) -> Self {
        IdentificationRecord {
            modification: c.entry.name.clone(),
            spectrum_title: c.spectrum.title().to_string(),
            retention_time_seconds: c.spectrum.retention_time_seconds(),
            precursor_mass: c.spectrum.precursor_mass(),
            reference_mass: c.entry.reference_mass,
            precursor_mass_error: c.spectrum.precursor_mass() - c.entry.reference_mass,
            score_percent: c.score.score_percent,
            matched_ions: c.score.matched_count,
            total_ions: c.score.total_count,
            matched_intensity: c.score.matched_intensity,
        }
    }
}

/// Candidates of a single spectrum plus the tally of what was dropped.
pub type SpectrumCandidates<'a> = (Vec<Candidate<'a>>, FilterCounts);

/// Generates candidates for one spectrum at a time.
///
/// Holds only shared, read-only state so it can be used from many threads.
#[derive(Debug, Clone)]
pub struct CandidateGenerator<'db> {
    entries: Vec<&'db ModificationEntry>,
    precursor_tolerance: Tolerance,
    scorer: ProductIonScorer,
    score_threshold: f64,
}

impl<'db> CandidateGenerator<'db> {
    pub fn new(
        entries: Vec<&'db ModificationEntry>,
        precursor_tolerance: Tolerance,
        scorer: ProductIonScorer,
        score_threshold: f64,
    ) -> Self {
        Self {
            entries,
            precursor_tolerance,
            scorer,
            score_threshold,
        }
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Tests every entry against `spectrum`, in database order.
    ///
    /// A spectrum without peaks is skipped and only counted.
    pub fn candidates_for<'a>(
        &self,
        spectrum: &'a Spectrum,
        buffer: &mut ScoringBuffer,
    ) -> SpectrumCandidates<'a>
    where
        'db: 'a,
    {
        let mut counts = FilterCounts {
            spectra_processed: 1,
            ..Default::default()
        };
        let mut out = Vec::new();

        if spectrum.is_empty() {
            debug!("Skipping spectrum {} with no peaks", spectrum.title());
            counts.empty_spectra += 1;
            return (out, counts);
        }

        for &entry in self.entries.iter() {
            match self
                .precursor_tolerance
                .contains(spectrum.precursor_mass(), entry.reference_mass)
            {
                Ok(true) => {}
                Ok(false) => {
                    counts.mass_mismatch += 1;
                    continue;
                }
                Err(e) => {
                    debug!("Skipping {} for {}: {}", entry.name, spectrum.title(), e);
                    counts.invalid_tolerance += 1;
                    continue;
                }
            }

            let score = match self.scorer.score_with_buffer(
                spectrum.peaks(),
                &entry.reference_product_ions,
                buffer,
            ) {
                Ok(score) => score,
                Err(e) => {
                    debug!("Skipping {} for {}: {}", entry.name, spectrum.title(), e);
                    counts.invalid_tolerance += 1;
                    continue;
                }
            };

            if score.score_percent >= self.score_threshold {
                out.push(Candidate {
                    entry,
                    spectrum,
                    score,
                });
            } else {
                counts.below_score_threshold += 1;
            }
        }

        (out, counts)
    }
}
