//! Mascot Generic Format peak lists, read with `mzdata`.
//!
//! Only the fields the matching needs are kept: title, retention time,
//! precursor mass, precursor charge and the peak list. Other headers are
//! left to `mzdata`.

use crate::errors::MgfError;
use crate::models::Spectrum;
use mzdata::io::{
    MGFError,
    MGFReader,
};
use mzdata::spectrum::MultiLayerSpectrum;
use std::fs::File;
use std::io::{
    self,
    Read,
};
use std::path::Path;
use tracing::{
    debug,
    info,
};

const PROTON: f64 = 1.00727646677;

/// Streaming MGF reader, yielding one spectrum per `BEGIN IONS` block.
///
/// The iterator stops after the first error.
pub struct MgfReader<R: Read> {
    inner: MGFReader<R>,
    blocks_read: usize,
    done: bool,
}

impl<R: Read> MgfReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            inner: MGFReader::new(source),
            blocks_read: 0,
            done: false,
        }
    }

    /// Reads the next complete spectrum, `None` at the end of input.
    pub fn read_next(&mut self) -> Option<Result<Spectrum, MgfError>> {
        if self.done {
            return None;
        }
        let mut raw: MultiLayerSpectrum = MultiLayerSpectrum::default();
        let res = match self.inner.read_into(&mut raw) {
            Ok(_) => {
                self.blocks_read += 1;
                Some(convert_spectrum(raw, self.blocks_read))
            }
            Err(MGFError::IOError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => None,
            Err(MGFError::IOError(e)) => Some(Err(MgfError::Io(e))),
            Err(e) => Some(Err(MgfError::Parse(e))),
        };
        if !matches!(res, Some(Ok(_))) {
            self.done = true;
        }
        res
    }
}

impl<R: Read> Iterator for MgfReader<R> {
    type Item = Result<Spectrum, MgfError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next()
    }
}

/// Maps an `mzdata` spectrum onto the fields the matching uses.
///
/// Blocks without a `TITLE` are named by their 1-based position.
fn convert_spectrum(raw: MultiLayerSpectrum, block_index: usize) -> Result<Spectrum, MgfError> {
    let description = raw.description;
    let title = if description.id.is_empty() {
        block_index.to_string()
    } else {
        description.id
    };

    // mzdata stores RTINSECONDS in minutes
    let retention_time_seconds = description
        .acquisition
        .first_scan()
        .map(|scan| scan.start_time * 60.0)
        .unwrap_or(0.0);
    if !retention_time_seconds.is_finite() || retention_time_seconds < 0.0 {
        return Err(MgfError::MalformedHeader {
            spectrum: title,
            msg: format!(
                "RTINSECONDS must be finite and non-negative, got {}",
                retention_time_seconds
            ),
        });
    }

    let Some(ion) = description
        .precursor
        .first()
        .and_then(|precursor| precursor.ions.first())
    else {
        return Err(MgfError::MissingPrecursorMass { spectrum: title });
    };
    if !ion.mz.is_finite() || ion.mz <= 0.0 {
        return Err(MgfError::MalformedHeader {
            spectrum: title,
            msg: format!("PEPMASS must be finite and positive, got {}", ion.mz),
        });
    }
    let charge = ion.charge;
    let mut spectrum = Spectrum::new(title, retention_time_seconds, ion.mz);
    if let Some(charge) = charge {
        spectrum.set_charge(charge);
    }

    if let Some(peaks) = raw.peaks {
        for peak in peaks.iter() {
            spectrum.push_peak(peak.mz, peak.intensity as f64);
        }
    } else if let Some(peaks) = raw.deconvoluted_peaks {
        // Peak lines with a charge column come back as neutral masses
        debug!("Spectrum {} has charged peaks", spectrum.title());
        for peak in peaks.iter() {
            let mz = mass_charge_ratio(peak.neutral_mass, peak.charge);
            spectrum.push_peak(mz, peak.intensity as f64);
        }
    }
    Ok(spectrum)
}

fn mass_charge_ratio(neutral_mass: f64, charge: i32) -> f64 {
    let z = if charge == 0 { 1 } else { charge };
    (neutral_mass + z as f64 * PROTON) / z.abs() as f64
}

/// Reads every spectrum of an MGF file.
pub fn read_mgf_file(path: impl AsRef<Path>) -> Result<Vec<Spectrum>, MgfError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MgfError::FileOpen {
        source,
        path: path.to_path_buf(),
    })?;
    let spectra = MgfReader::new(file).collect::<Result<Vec<_>, _>>()?;
    info!("Read {} spectra from {}", spectra.len(), path.display());
    Ok(spectra)
}
