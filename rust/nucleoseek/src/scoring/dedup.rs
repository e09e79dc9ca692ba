//! Exclusion-time deduplication.
//!
//! A species that elutes for a while gets fragmented many times. Candidates
//! of the same modification form a run as long as each one is within the
//! exclusion time of the previous candidate of that modification; only the
//! best-scoring candidate of each run is reported. Ties go to the earlier
//! candidate.

use super::candidates::Candidate;
use std::collections::HashMap;

struct OpenRun {
    best: usize,
    last_rt: f64,
}

/// Keeps the best candidate of every run, in time order.
///
/// `candidates` must be ordered by ascending retention time. Returns the
/// survivors and the number of candidates that were removed.
pub fn deduplicate<'a>(
    candidates: Vec<Candidate<'a>>,
    exclusion_time_seconds: f64,
) -> (Vec<Candidate<'a>>, usize) {
    debug_assert!(
        candidates
            .windows(2)
            .all(|w| {
                w[0].retention_time_seconds()
                    .total_cmp(&w[1].retention_time_seconds())
                    .is_le()
            }),
        "Candidates must be sorted by retention time before deduplication"
    );

    let mut open_runs: HashMap<&'a str, OpenRun> = HashMap::new();
    let mut keep = vec![false; candidates.len()];

    for (idx, cand) in candidates.iter().enumerate() {
        let rt = cand.retention_time_seconds();
        match open_runs.get_mut(cand.entry.name.as_str()) {
            Some(run) if rt - run.last_rt <= exclusion_time_seconds => {
                if cand.score_percent() > candidates[run.best].score_percent() {
                    run.best = idx;
                }
                run.last_rt = rt;
            }
            Some(run) => {
                keep[run.best] = true;
                *run = OpenRun {
                    best: idx,
                    last_rt: rt,
                };
            }
            None => {
                open_runs.insert(
                    cand.entry.name.as_str(),
                    OpenRun {
                        best: idx,
                        last_rt: rt,
                    },
                );
            }
        }
    }
    for run in open_runs.values() {
        keep[run.best] = true;
    }

    let total = candidates.len();
    let survivors: Vec<Candidate<'a>> = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(cand, keep)| keep.then_some(cand))
        .collect();
    let removed = total - survivors.len();
    (survivors, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ModificationEntry,
        Spectrum,
    };
    use crate::scoring::scorer::MatchScore;

    fn score(pct: f64) -> MatchScore {
        MatchScore {
            score_percent: pct,
            matched_count: 0,
            total_count: 0,
            matched_intensity: 0.0,
        }
    }

    fn titles(cands: &[Candidate<'_>]) -> Vec<String> {
        cands.iter().map(|c| c.spectrum.title().to_string()).collect()
    }

    #[test]
    fn test_window_merges_close_detections() {
        let x = ModificationEntry::new("X", 300.0, vec![]);
        let s10 = Spectrum::new("S10", 10.0, 300.0);
        let s40 = Spectrum::new("S40", 40.0, 300.0);
        let cands = vec![
            Candidate {
                entry: &x,
                spectrum: &s10,
                score: score(60.0),
            },
            Candidate {
                entry: &x,
                spectrum: &s40,
                score: score(80.0),
            },
        ];

        let (kept, removed) = deduplicate(cands.clone(), 60.0);
        assert_eq!(titles(&kept), vec!["S40"]);
        assert_eq!(removed, 1);

        let (kept, removed) = deduplicate(cands, 20.0);
        assert_eq!(titles(&kept), vec!["S10", "S40"]);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_tie_keeps_earliest() {
        let x = ModificationEntry::new("X", 300.0, vec![]);
        let s10 = Spectrum::new("S10", 10.0, 300.0);
        let s40 = Spectrum::new("S40", 40.0, 300.0);
        let cands = vec![
            Candidate {
                entry: &x,
                spectrum: &s10,
                score: score(75.0),
            },
            Candidate {
                entry: &x,
                spectrum: &s40,
                score: score(75.0),
            },
        ];
        let (kept, _) = deduplicate(cands, 60.0);
        assert_eq!(titles(&kept), vec!["S10"]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let x = ModificationEntry::new("X", 300.0, vec![]);
        let s0 = Spectrum::new("S0", 0.0, 300.0);
        let s30 = Spectrum::new("S30", 30.0, 300.0);
        let cands = vec![
            Candidate {
                entry: &x,
                spectrum: &s0,
                score: score(50.0),
            },
            Candidate {
                entry: &x,
                spectrum: &s30,
                score: score(40.0),
            },
        ];
        let (kept, removed) = deduplicate(cands, 30.0);
        assert_eq!(titles(&kept), vec!["S0"]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_runs_chain_through_predecessors() {
        // 0 -> 50 -> 100 are each within 60s of the previous one, so they form
        // a single run even though 0 and 100 are further apart.
        let x = ModificationEntry::new("X", 300.0, vec![]);
        let spectra: Vec<Spectrum> = [0.0, 50.0, 100.0, 200.0]
            .iter()
            .map(|rt| Spectrum::new(format!("S{rt}"), *rt, 300.0))
            .collect();
        let scores = [40.0, 90.0, 70.0, 10.0];
        let cands: Vec<Candidate> = spectra
            .iter()
            .zip(scores)
            .map(|(s, p)| Candidate {
                entry: &x,
                spectrum: s,
                score: score(p),
            })
            .collect();

        let (kept, removed) = deduplicate(cands, 60.0);
        assert_eq!(titles(&kept), vec!["S50", "S200"]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_modifications_are_independent() {
        let x = ModificationEntry::new("X", 300.0, vec![]);
        let y = ModificationEntry::new("Y", 300.0, vec![]);
        let s10 = Spectrum::new("S10", 10.0, 300.0);
        let s20 = Spectrum::new("S20", 20.0, 300.0);
        let s30 = Spectrum::new("S30", 30.0, 300.0);
        let cands = vec![
            Candidate {
                entry: &x,
                spectrum: &s10,
                score: score(50.0),
            },
            Candidate {
                entry: &y,
                spectrum: &s10,
                score: score(90.0),
            },
            Candidate {
                entry: &y,
                spectrum: &s20,
                score: score(95.0),
            },
            Candidate {
                entry: &x,
                spectrum: &s30,
                score: score(60.0),
            },
        ];
        let (kept, removed) = deduplicate(cands, 60.0);
        let kept: Vec<(&str, &str)> = kept
            .iter()
            .map(|c| (c.modification(), c.spectrum.title()))
            .collect();
        assert_eq!(kept, vec![("Y", "S20"), ("X", "S30")]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_non_finite_retention_time_does_not_panic() {
        let x = ModificationEntry::new("X", 300.0, vec![]);
        let s10 = Spectrum::new("S10", 10.0, 300.0);
        let nan = Spectrum::new("NaN", f64::NAN, 300.0);
        // total_cmp puts positive NaN after every finite time
        let cands = vec![
            Candidate {
                entry: &x,
                spectrum: &s10,
                score: score(60.0),
            },
            Candidate {
                entry: &x,
                spectrum: &nan,
                score: score(90.0),
            },
        ];
        let (kept, removed) = deduplicate(cands, 60.0);
        assert_eq!(titles(&kept), vec!["S10", "NaN"]);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_empty_input() {
        let (kept, removed) = deduplicate(Vec::new(), 60.0);
        assert!(kept.is_empty());
        assert_eq!(removed, 0);
    }
}
