use serde::Serialize;

/// One accepted, deduplicated match between a spectrum and a modification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentificationRecord {
    pub modification: String,
    pub spectrum_title: String,
    pub retention_time_seconds: f64,
    pub precursor_mass: f64,
    pub reference_mass: f64,
    /// Observed minus reference precursor mass, in daltons.
    pub precursor_mass_error: f64,
    pub score_percent: f64,
    pub matched_ions: usize,
    pub total_ions: usize,
    pub matched_intensity: f64,
}

impl IdentificationRecord {
    /// Column names, in serialization order.
    pub const COLUMNS: [&'static str; 10] = [
        "modification",
        "spectrum_title",
        "retention_time_seconds",
        "precursor_mass",
        "reference_mass",
        "precursor_mass_error",
        "score_percent",
        "matched_ions",
        "total_ions",
        "matched_intensity",
    ];
}
