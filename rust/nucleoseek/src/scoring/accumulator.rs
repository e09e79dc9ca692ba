//! Accumulator for parallel candidate generation.
//!
//! Each rayon worker folds the candidates of the spectra it handled into its
//! own [`CandidateBatch`], partial batches are then merged pairwise. Merging
//! keeps the left-to-right order of the input spectra, so the result does not
//! depend on the number of threads.

use super::candidates::{
    Candidate,
    SpectrumCandidates,
};
use super::timings::EngineTimings;
use rayon::iter::{
    FromParallelIterator,
    IntoParallelIterator,
    ParallelIterator,
};
use serde::Serialize;

/// Per-worker tally of processed spectra and dropped candidates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub spectra_processed: usize,
    pub empty_spectra: usize,
    /// Candidates dropped because the precursor mass did not match.
    pub mass_mismatch: usize,
    /// Candidates dropped because the product-ion score was too low.
    pub below_score_threshold: usize,
    /// Pairs that could not be evaluated (ppm tolerance on a zero mass).
    pub invalid_tolerance: usize,
}

impl FilterCounts {
    /// Total of filtered-out candidates, as reported to the user.
    pub fn filtered(&self) -> usize {
        self.mass_mismatch + self.below_score_threshold
    }
}

impl std::ops::AddAssign for FilterCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.spectra_processed += rhs.spectra_processed;
        self.empty_spectra += rhs.empty_spectra;
        self.mass_mismatch += rhs.mass_mismatch;
        self.below_score_threshold += rhs.below_score_threshold;
        self.invalid_tolerance += rhs.invalid_tolerance;
    }
}

/// Accepted candidates of one or more spectra, not yet deduplicated.
#[derive(Debug, Default)]
pub struct CandidateBatch<'a> {
    pub candidates: Vec<Candidate<'a>>,
    pub counts: FilterCounts,
    pub timings: EngineTimings,
}

impl<'a> CandidateBatch<'a> {
    /// Appends `other` after the candidates already held.
    pub fn extend(&mut self, other: CandidateBatch<'a>) {
        self.candidates.extend(other.candidates);
        self.counts += other.counts;
        self.timings += other.timings;
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn reduce(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }

    fn fold(mut self, item: SpectrumCandidates<'a>) -> Self {
        self.candidates.extend(item.0);
        self.counts += item.1;
        self
    }
}

impl<'a> FromIterator<SpectrumCandidates<'a>> for CandidateBatch<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = SpectrumCandidates<'a>>,
    {
        iter.into_iter()
            .fold(CandidateBatch::default(), CandidateBatch::fold)
    }
}

impl<'a> FromParallelIterator<SpectrumCandidates<'a>> for CandidateBatch<'a> {
    fn from_par_iter<I>(par_iter: I) -> Self
    where
        I: IntoParallelIterator<Item = SpectrumCandidates<'a>>,
    {
        par_iter
            .into_par_iter()
            .fold(CandidateBatch::default, CandidateBatch::fold)
            .reduce(CandidateBatch::default, CandidateBatch::reduce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ModificationEntry,
        Spectrum,
    };
    use crate::scoring::scorer::MatchScore;
    use rayon::prelude::*;

    #[test]
    fn test_parallel_collect_keeps_order() {
        let entry = ModificationEntry::new("ModA", 300.0, vec![150.0]);
        let spectra: Vec<Spectrum> = (0..500)
            .map(|i| Spectrum::new(format!("S{i}"), i as f64, 300.0))
            .collect();
        let score = MatchScore {
            score_percent: 100.0,
            matched_count: 1,
            total_count: 1,
            matched_intensity: 1.0,
        };

        let batch: CandidateBatch = spectra
            .par_iter()
            .map(|s| {
                let counts = FilterCounts {
                    spectra_processed: 1,
                    mass_mismatch: 2,
                    ..Default::default()
                };
                (
                    vec![Candidate {
                        entry: &entry,
                        spectrum: s,
                        score,
                    }],
                    counts,
                )
            })
            .collect();

        assert_eq!(batch.len(), 500);
        assert_eq!(batch.counts.spectra_processed, 500);
        assert_eq!(batch.counts.filtered(), 1000);
        assert!(
            batch
                .candidates
                .windows(2)
                .all(|w| w[0].retention_time_seconds() < w[1].retention_time_seconds())
        );
    }
}
