mod database;
mod identification;
mod parameters;
mod spectrum;
pub mod tolerance;

pub use database::{
    MergePolicy,
    ModificationDatabase,
    ModificationEntry,
};
pub use identification::IdentificationRecord;
pub use parameters::AnalysisParameters;
pub use spectrum::{
    Peak,
    Spectrum,
};
pub use tolerance::{
    Tolerance,
    ToleranceKind,
    within_tolerance,
};
