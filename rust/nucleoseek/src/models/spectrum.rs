use serde::Serialize;

/// A single fragment peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    pub mass: f64,
    pub intensity: f64,
}

impl From<(f64, f64)> for Peak {
    fn from((mass, intensity): (f64, f64)) -> Self {
        Self { mass, intensity }
    }
}

/// One MS/MS acquisition.
///
/// Peaks keep acquisition order; they are only ever appended.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrum {
    title: String,
    retention_time_seconds: f64,
    precursor_mass: f64,
    charge: Option<i32>,
    peaks: Vec<Peak>,
}

impl Spectrum {
    pub fn new(title: impl Into<String>, retention_time_seconds: f64, precursor_mass: f64) -> Self {
        Self {
            title: title.into(),
            retention_time_seconds,
            precursor_mass,
            charge: None,
            peaks: Vec::new(),
        }
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = Some(charge);
        self
    }

    /// Appends every `(mass, intensity)` pair, in order.
    pub fn with_peaks(mut self, peaks: impl IntoIterator<Item = (f64, f64)>) -> Self {
        self.peaks.extend(peaks.into_iter().map(Peak::from));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn retention_time_seconds(&self) -> f64 {
        self.retention_time_seconds
    }

    pub fn set_retention_time_seconds(&mut self, retention_time_seconds: f64) {
        self.retention_time_seconds = retention_time_seconds;
    }

    /// Measured [M+H]+ of the precursor.
    pub fn precursor_mass(&self) -> f64 {
        self.precursor_mass
    }

    pub fn set_precursor_mass(&mut self, precursor_mass: f64) {
        self.precursor_mass = precursor_mass;
    }

    pub fn charge(&self) -> Option<i32> {
        self.charge
    }

    pub fn set_charge(&mut self, charge: i32) {
        self.charge = Some(charge);
    }

    pub fn push_peak(&mut self, mass: f64, intensity: f64) {
        self.peaks.push(Peak { mass, intensity });
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn num_peaks(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}
