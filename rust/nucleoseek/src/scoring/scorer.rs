//! Product-ion match scoring.
//!
//! A modification scores the percentage of its reference product ions that
//! are found among the spectrum peaks. Assignment is greedy and one-to-one:
//! reference ions are visited in database order and each takes the first
//! still-unassigned peak (in acquisition order) that lies within tolerance.
//! This is not an optimal bipartite matching.

use crate::errors::ToleranceError;
use crate::models::{
    Peak,
    Tolerance,
    ToleranceKind,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchScore {
    /// `100 * matched_count / total_count`, 0 when there are no reference ions.
    pub score_percent: f64,
    pub matched_count: usize,
    pub total_count: usize,
    /// Summed intensity of the peaks that were assigned to a reference ion.
    pub matched_intensity: f64,
}

impl MatchScore {
    fn from_counts(matched_count: usize, total_count: usize, matched_intensity: f64) -> Self {
        let score_percent = if total_count == 0 {
            0.0
        } else {
            100.0 * matched_count as f64 / total_count as f64
        };
        Self {
            score_percent,
            matched_count,
            total_count,
            matched_intensity,
        }
    }
}

/// Scratch space reused across calls to avoid allocating per candidate.
#[derive(Debug, Default)]
pub struct ScoringBuffer {
    surviving: Vec<usize>,
    used: Vec<bool>,
}

impl ScoringBuffer {
    fn reset(&mut self, peaks: &[Peak], intensity_threshold: f64) {
        self.surviving.clear();
        self.surviving.extend(
            peaks
                .iter()
                .enumerate()
                .filter(|(_, p)| p.intensity >= intensity_threshold)
                .map(|(i, _)| i),
        );
        self.used.clear();
        self.used.resize(self.surviving.len(), false);
    }
}

/// Scores spectra against reference product ions with fixed settings.
#[derive(Debug, Clone, Copy)]
pub struct ProductIonScorer {
    pub tolerance: Tolerance,
    pub intensity_threshold: f64,
}

impl ProductIonScorer {
    pub fn new(tolerance: Tolerance, intensity_threshold: f64) -> Self {
        Self {
            tolerance,
            intensity_threshold,
        }
    }

    pub fn score(
        &self,
        peaks: &[Peak],
        reference_ions: &[f64],
    ) -> Result<MatchScore, ToleranceError> {
        let mut buffer = ScoringBuffer::default();
        self.score_with_buffer(peaks, reference_ions, &mut buffer)
    }

    /// Same as [`ProductIonScorer::score`], reusing `buffer`.
    pub fn score_with_buffer(
        &self,
        peaks: &[Peak],
        reference_ions: &[f64],
        buffer: &mut ScoringBuffer,
    ) -> Result<MatchScore, ToleranceError> {
        if reference_ions.is_empty() {
            return Ok(MatchScore::from_counts(0, 0, 0.0));
        }
        buffer.reset(peaks, self.intensity_threshold);

        let mut matched_count = 0;
        let mut matched_intensity = 0.0;
        for &ion in reference_ions {
            for (slot, &peak_idx) in buffer.surviving.iter().enumerate() {
                if buffer.used[slot] {
                    continue;
                }
                let peak = &peaks[peak_idx];
                if self.tolerance.contains(peak.mass, ion)? {
                    buffer.used[slot] = true;
                    matched_count += 1;
                    matched_intensity += peak.intensity;
                    break;
                }
            }
        }

        Ok(MatchScore::from_counts(
            matched_count,
            reference_ions.len(),
            matched_intensity,
        ))
    }
}

/// Free-standing scoring entry point.
pub fn score(
    peaks: &[Peak],
    reference_ions: &[f64],
    ms_ms_tolerance: f64,
    ms_ms_tolerance_type: ToleranceKind,
    intensity_threshold: f64,
) -> Result<MatchScore, ToleranceError> {
    ProductIonScorer::new(
        Tolerance::new(ms_ms_tolerance, ms_ms_tolerance_type),
        intensity_threshold,
    )
    .score(peaks, reference_ions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks(values: &[(f64, f64)]) -> Vec<Peak> {
        values.iter().copied().map(Peak::from).collect()
    }

    #[test]
    fn test_full_match_scores_100() {
        let peaks = peaks(&[(150.0, 100.0), (160.0, 50.0)]);
        let res = score(&peaks, &[150.0, 160.0], 0.02, ToleranceKind::Absolute, 0.0).unwrap();
        assert_eq!(res.matched_count, 2);
        assert_eq!(res.total_count, 2);
        assert_eq!(res.score_percent, 100.0);
        assert_eq!(res.matched_intensity, 150.0);
    }

    #[test]
    fn test_partial_match() {
        let peaks = peaks(&[(150.005, 10.0), (200.0, 10.0)]);
        let res = score(
            &peaks,
            &[150.0, 160.0, 170.0, 180.0],
            0.01,
            ToleranceKind::Absolute,
            0.0,
        )
        .unwrap();
        assert_eq!(res.matched_count, 1);
        assert_eq!(res.score_percent, 25.0);
    }

    #[test]
    fn test_empty_reference_always_zero() {
        let peaks = peaks(&[(150.0, 100.0)]);
        let res = score(&peaks, &[], 0.02, ToleranceKind::Absolute, 0.0).unwrap();
        assert_eq!(res.score_percent, 0.0);
        assert_eq!(res.matched_count, 0);

        let res = score(&[], &[], 0.02, ToleranceKind::Absolute, 0.0).unwrap();
        assert_eq!(res.score_percent, 0.0);
    }

    #[test]
    fn test_empty_spectrum_scores_zero() {
        let res = score(&[], &[150.0], 0.02, ToleranceKind::Absolute, 0.0).unwrap();
        assert_eq!(res.score_percent, 0.0);
        assert_eq!(res.total_count, 1);
    }

    #[test]
    fn test_one_peak_satisfies_one_ion() {
        // Two reference ions close enough to share a single peak
        let peaks = peaks(&[(150.0, 100.0)]);
        let res = score(&peaks, &[150.005, 149.995], 0.01, ToleranceKind::Absolute, 0.0).unwrap();
        assert_eq!(res.matched_count, 1);
        assert_eq!(res.score_percent, 50.0);
    }

    #[test]
    fn test_greedy_takes_first_peak_in_spectrum_order() {
        // The first ion grabs the first peak in range, even though the second
        // peak would have left room for the second ion.
        let peaks = peaks(&[(100.01, 1.0), (100.0, 2.0)]);
        let scorer = ProductIonScorer::new(Tolerance::new(0.015, ToleranceKind::Absolute), 0.0);
        let res = scorer.score(&peaks, &[100.0, 100.02]).unwrap();
        assert_eq!(res.matched_count, 1);
        assert_eq!(res.matched_intensity, 1.0);
    }

    #[test]
    fn test_intensity_threshold_discards_peaks() {
        let peaks = peaks(&[(150.0, 5.0), (160.0, 50.0)]);
        let res = score(&peaks, &[150.0, 160.0], 0.02, ToleranceKind::Absolute, 10.0).unwrap();
        assert_eq!(res.matched_count, 1);
        assert_eq!(res.score_percent, 50.0);

        // Threshold is inclusive
        let res = score(&peaks, &[150.0, 160.0], 0.02, ToleranceKind::Absolute, 5.0).unwrap();
        assert_eq!(res.matched_count, 2);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let peaks = peaks(&[(150.0, 1.0), (150.01, 2.0), (161.0, 3.0), (170.0, 4.0)]);
        let ions = [150.005, 161.0, 175.0];
        let scorer = ProductIonScorer::new(Tolerance::new(0.01, ToleranceKind::Absolute), 0.0);
        let mut buffer = ScoringBuffer::default();
        let first = scorer.score_with_buffer(&peaks, &ions, &mut buffer).unwrap();
        let second = scorer.score_with_buffer(&peaks, &ions, &mut buffer).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, scorer.score(&peaks, &ions).unwrap());
    }

    #[test]
    fn test_ppm_zero_ion_fails() {
        let peaks = peaks(&[(150.0, 1.0)]);
        let res = score(&peaks, &[0.0], 10.0, ToleranceKind::Ppm, 0.0);
        assert!(res.is_err());
    }
}
