mod accumulator;
mod candidates;
mod dedup;
pub mod scorer;
pub mod timings;

pub use accumulator::{
    CandidateBatch,
    FilterCounts,
};
pub use candidates::{
    Candidate,
    CandidateGenerator,
    SpectrumCandidates,
};
pub use dedup::deduplicate;
pub use scorer::{
    MatchScore,
    ProductIonScorer,
    ScoringBuffer,
    score,
};
pub use timings::EngineTimings;
