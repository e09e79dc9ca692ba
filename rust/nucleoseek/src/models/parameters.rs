use super::tolerance::{
    Tolerance,
    ToleranceKind,
};
use crate::errors::AnalysisError;
use serde::{
    Deserialize,
    Serialize,
};

/// Numeric settings of a matching run.
///
/// Every field is required, the engine has no defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AnalysisParameters {
    /// Precursor-mass tolerance magnitude.
    pub ms_tolerance: f64,
    pub ms_tolerance_type: ToleranceKind,
    /// Product-ion tolerance magnitude.
    pub ms_ms_tolerance: f64,
    pub ms_ms_tolerance_type: ToleranceKind,
    /// Minimum match score, in percent, for a candidate to be kept.
    pub ms_ms_score_threshold: f64,
    /// Peaks below this intensity never count as matches.
    pub ms_ms_intensity_threshold: f64,
    /// Minimum retention-time separation for two detections of the same
    /// modification to be reported separately.
    pub exclusion_time_seconds: f64,
}

impl AnalysisParameters {
    pub fn precursor_tolerance(&self) -> Tolerance {
        Tolerance::new(self.ms_tolerance, self.ms_tolerance_type)
    }

    pub fn product_ion_tolerance(&self) -> Tolerance {
        Tolerance::new(self.ms_ms_tolerance, self.ms_ms_tolerance_type)
    }

    /// Checks every numeric field against its legal domain.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fields = [
            ("ms_tolerance", self.ms_tolerance),
            ("ms_ms_tolerance", self.ms_ms_tolerance),
            ("ms_ms_score_threshold", self.ms_ms_score_threshold),
            ("ms_ms_intensity_threshold", self.ms_ms_intensity_threshold),
            ("exclusion_time_seconds", self.exclusion_time_seconds),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::InvalidParameters {
                    field,
                    value,
                    reason: "must be a finite number",
                });
            }
            if value < 0.0 {
                return Err(AnalysisError::InvalidParameters {
                    field,
                    value,
                    reason: "must not be negative",
                });
            }
        }
        if self.ms_ms_score_threshold > 100.0 {
            return Err(AnalysisError::InvalidParameters {
                field: "ms_ms_score_threshold",
                value: self.ms_ms_score_threshold,
                reason: "is a percentage and cannot exceed 100",
            });
        }
        Ok(())
    }
}
