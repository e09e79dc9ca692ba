pub mod data_sources;
pub mod engine;
pub mod errors;
pub mod models;
pub mod output;
pub mod scoring;

pub use engine::{
    AnalysisEngine,
    AnalysisOutput,
    RunStatistics,
    find_modifications,
    order_by_retention_time,
};
pub use errors::{
    AnalysisError,
    NucleoseekError,
    Result,
};
pub use models::{
    AnalysisParameters,
    IdentificationRecord,
    MergePolicy,
    ModificationDatabase,
    ModificationEntry,
    Peak,
    Spectrum,
    Tolerance,
    ToleranceKind,
    within_tolerance,
};
pub use scoring::{
    CandidateBatch,
    MatchScore,
    score,
};
