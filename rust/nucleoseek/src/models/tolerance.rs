use crate::errors::ToleranceError;
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;

/// Slack (in units of the compared magnitudes) granted on top of the
/// tolerance window, so that boundaries written in decimal stay inclusive
/// after conversion to binary floating point.
const REPRESENTATION_SLACK: f64 = 4.0 * f64::EPSILON;

/// How a tolerance magnitude is interpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ToleranceKind {
    /// Fixed window in daltons.
    #[serde(rename = "da")]
    Absolute,
    /// Window in parts-per-million of the reference mass.
    #[serde(rename = "ppm")]
    Ppm,
}

impl Display for ToleranceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToleranceKind::Absolute => write!(f, "Da"),
            ToleranceKind::Ppm => write!(f, "ppm"),
        }
    }
}

/// Symmetric mass tolerance.
///
/// Convention: the magnitude is the half-width of the window, so a tolerance
/// of 0.02 Da around 100.0 accepts everything in `[99.98, 100.02]`.
///
/// Example:
/// ```
/// use nucleoseek::{Tolerance, ToleranceKind};
///
/// let tol = Tolerance::new(10.0, ToleranceKind::Ppm);
/// let (low, high) = tol.window(500.0).unwrap();
/// assert!((low - 499.995).abs() < 1e-9);
/// assert!((high - 500.005).abs() < 1e-9);
/// assert!(tol.contains(500.004, 500.0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Tolerance {
    pub magnitude: f64,
    pub kind: ToleranceKind,
}

impl Tolerance {
    pub fn new(magnitude: f64, kind: ToleranceKind) -> Self {
        Self { magnitude, kind }
    }

    /// Half-width of the acceptance window around `reference`.
    ///
    /// Fails for ppm tolerances when `reference` is not a positive finite
    /// mass, since the window would be degenerate.
    pub fn half_width(&self, reference: f64) -> Result<f64, ToleranceError> {
        match self.kind {
            ToleranceKind::Absolute => Ok(self.magnitude),
            ToleranceKind::Ppm => {
                if !(reference.is_finite() && reference > 0.0) {
                    return Err(ToleranceError::InvalidTolerance { reference });
                }
                Ok(reference * self.magnitude / 1e6)
            }
        }
    }

    /// Inclusive `(low, high)` mass window around `reference`.
    pub fn window(&self, reference: f64) -> Result<(f64, f64), ToleranceError> {
        let half_width = self.half_width(reference)?;
        Ok((reference - half_width, reference + half_width))
    }

    /// Whether `observed` falls inside the window around `reference`.
    /// The boundary is inclusive.
    pub fn contains(&self, observed: f64, reference: f64) -> Result<bool, ToleranceError> {
        let half_width = self.half_width(reference)?;
        let slack = REPRESENTATION_SLACK * observed.abs().max(reference.abs());
        Ok((observed - reference).abs() <= half_width + slack)
    }
}

impl Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude, self.kind)
    }
}

/// Free-standing form of [`Tolerance::contains`].
pub fn within_tolerance(
    observed: f64,
    reference: f64,
    magnitude: f64,
    kind: ToleranceKind,
) -> Result<bool, ToleranceError> {
    Tolerance::new(magnitude, kind).contains(observed, reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_tolerance() {
        assert!(within_tolerance(100.02, 100.00, 0.02, ToleranceKind::Absolute).unwrap());
        assert!(!within_tolerance(100.03, 100.00, 0.02, ToleranceKind::Absolute).unwrap());
        assert!(within_tolerance(99.98, 100.00, 0.02, ToleranceKind::Absolute).unwrap());
    }

    #[test]
    fn test_ppm_tolerance_inclusive_boundary() {
        // 1 ppm of 100 is 0.0001
        assert!(within_tolerance(100.0001, 100.0, 1.0, ToleranceKind::Ppm).unwrap());
        assert!(within_tolerance(99.9999, 100.0, 1.0, ToleranceKind::Ppm).unwrap());
        assert!(!within_tolerance(100.0002, 100.0, 1.0, ToleranceKind::Ppm).unwrap());
    }

    #[test]
    fn test_ppm_zero_reference_is_invalid() {
        let res = within_tolerance(0.0, 0.0, 10.0, ToleranceKind::Ppm);
        assert_eq!(
            res,
            Err(ToleranceError::InvalidTolerance { reference: 0.0 })
        );
        // Absolute tolerances do not care about the reference value
        assert!(within_tolerance(0.01, 0.0, 0.02, ToleranceKind::Absolute).unwrap());
    }

    #[test]
    fn test_window() {
        let tol = Tolerance::new(0.5, ToleranceKind::Absolute);
        assert_eq!(tol.window(10.0).unwrap(), (9.5, 10.5));

        let tol = Tolerance::new(20.0, ToleranceKind::Ppm);
        let (low, high) = tol.window(500.0).unwrap();
        assert!((low - 499.99).abs() < 1e-9);
        assert!((high - 500.01).abs() < 1e-9);
    }

    #[test]
    fn test_kind_serde_names() {
        let tol: Tolerance = serde_json::from_str(r#"{"magnitude": 5.0, "kind": "ppm"}"#).unwrap();
        assert_eq!(tol, Tolerance::new(5.0, ToleranceKind::Ppm));
        let kind: ToleranceKind = serde_json::from_str(r#""da""#).unwrap();
        assert_eq!(kind, ToleranceKind::Absolute);
    }
}
