//! Writers for the identification table and the run summary.

use crate::engine::{
    AnalysisOutput,
    RunStatistics,
};
use crate::errors::OutputError;
use crate::models::{
    AnalysisParameters,
    IdentificationRecord,
};
use rust_xlsxwriter::{
    Format,
    Workbook,
};
use serde::Serialize;
use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing::info;

/// Field separator of the identification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Tab for `.tsv` and `.txt` files, comma otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("txt") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }

    fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Writes the records with a header row, in the given order.
///
/// The header is written even when there are no records.
pub fn write_identifications<W: Write>(
    writer: W,
    records: &[IdentificationRecord],
    delimiter: Delimiter,
) -> Result<(), OutputError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(IdentificationRecord::COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Builds a single-sheet workbook with the same columns as the delimited table.
pub fn identifications_workbook(
    records: &[IdentificationRecord],
) -> Result<Workbook, OutputError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("identifications")?;

    for (col, name) in IdentificationRecord::COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &record.modification)?;
        sheet.write_string(row, 1, &record.spectrum_title)?;
        sheet.write_number(row, 2, record.retention_time_seconds)?;
        sheet.write_number(row, 3, record.precursor_mass)?;
        sheet.write_number(row, 4, record.reference_mass)?;
        sheet.write_number(row, 5, record.precursor_mass_error)?;
        sheet.write_number(row, 6, record.score_percent)?;
        sheet.write_number(row, 7, record.matched_ions as f64)?;
        sheet.write_number(row, 8, record.total_ions as f64)?;
        sheet.write_number(row, 9, record.matched_intensity)?;
    }
    Ok(workbook)
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"))
}

/// Writes a spreadsheet for `.xlsx` paths and a delimited table otherwise.
pub fn write_identifications_file(
    path: impl AsRef<Path>,
    records: &[IdentificationRecord],
) -> Result<(), OutputError> {
    let path = path.as_ref();
    if is_xlsx(path) {
        identifications_workbook(records)?.save(path)?;
    } else {
        let file = File::create(path).map_err(|source| OutputError::FileCreate {
            source,
            path: path.to_path_buf(),
        })?;
        write_identifications(BufWriter::new(file), records, Delimiter::from_path(path))?;
    }
    info!("Wrote {} identifications to {}", records.len(), path.display());
    Ok(())
}

/// Everything needed to reproduce and audit a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub spectra_file: Option<PathBuf>,
    pub database_files: Vec<PathBuf>,
    pub parameters: AnalysisParameters,
    pub num_identifications: usize,
    pub filtered_count: usize,
    pub stats: RunStatistics,
}

impl RunSummary {
    pub fn new(
        spectra_file: Option<PathBuf>,
        database_files: Vec<PathBuf>,
        parameters: AnalysisParameters,
        output: &AnalysisOutput,
    ) -> Self {
        Self {
            spectra_file,
            database_files,
            parameters,
            num_identifications: output.identifications.len(),
            filtered_count: output.filtered_count,
            stats: output.stats.clone(),
        }
    }
}

/// `<stem>.summary.json` beside the results table.
pub fn summary_path_for(output_path: &Path) -> PathBuf {
    output_path.with_extension("summary.json")
}

pub fn write_summary<W: Write>(writer: W, summary: &RunSummary) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

pub fn write_summary_file(path: impl AsRef<Path>, summary: &RunSummary) -> Result<(), OutputError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| OutputError::FileCreate {
        source,
        path: path.to_path_buf(),
    })?;
    let mut writer = BufWriter::new(file);
    write_summary(&mut writer, summary)?;
    writer.flush()?;
    info!("Wrote run summary to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToleranceKind;

    fn record() -> IdentificationRecord {
        IdentificationRecord {
            modification: "ModA".into(),
            spectrum_title: "S1".into(),
            retention_time_seconds: 5.0,
            precursor_mass: 300.0,
            reference_mass: 300.0,
            precursor_mass_error: 0.0,
            score_percent: 100.0,
            matched_ions: 2,
            total_ions: 2,
            matched_intensity: 150.0,
        }
    }

    #[test]
    fn test_delimiter_from_path() {
        assert_eq!(Delimiter::from_path(Path::new("out.tsv")), Delimiter::Tab);
        assert_eq!(Delimiter::from_path(Path::new("out.TXT")), Delimiter::Tab);
        assert_eq!(Delimiter::from_path(Path::new("out.csv")), Delimiter::Comma);
        assert_eq!(Delimiter::from_path(Path::new("out")), Delimiter::Comma);
    }

    #[test]
    fn test_write_table() {
        let mut buf = Vec::new();
        write_identifications(&mut buf, &[record()], Delimiter::Tab).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], IdentificationRecord::COLUMNS.join("\t"));
        assert!(lines[1].starts_with("ModA\tS1\t5.0\t300.0"));
        assert!(lines[1].ends_with("\t2\t2\t150.0"));
    }

    #[test]
    fn test_empty_table_has_header() {
        let mut buf = Vec::new();
        write_identifications(&mut buf, &[], Delimiter::Comma).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.trim_end(), IdentificationRecord::COLUMNS.join(","));
    }

    #[test]
    fn test_xlsx_workbook() {
        let mut workbook = identifications_workbook(&[record(), record()]).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();
        // xlsx files are zip archives
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_file_format_follows_extension() {
        let dir = std::env::temp_dir().join(format!("nucleoseek_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let xlsx = dir.join("results.XLSX");
        write_identifications_file(&xlsx, &[record()]).unwrap();
        let bytes = std::fs::read(&xlsx).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let tsv = dir.join("results.tsv");
        write_identifications_file(&tsv, &[record()]).unwrap();
        let text = std::fs::read_to_string(&tsv).unwrap();
        assert!(text.starts_with(&IdentificationRecord::COLUMNS.join("\t")));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_summary_json() {
        let params = AnalysisParameters {
            ms_tolerance: 5.0,
            ms_tolerance_type: ToleranceKind::Ppm,
            ms_ms_tolerance: 0.02,
            ms_ms_tolerance_type: ToleranceKind::Absolute,
            ms_ms_score_threshold: 50.0,
            ms_ms_intensity_threshold: 0.0,
            exclusion_time_seconds: 60.0,
        };
        let output = AnalysisOutput {
            identifications: vec![record()],
            filtered_count: 4,
            stats: RunStatistics::default(),
        };
        let summary = RunSummary::new(
            Some(PathBuf::from("run.mgf")),
            vec![PathBuf::from("db.csv")],
            params,
            &output,
        );
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["num_identifications"], 1);
        assert_eq!(json["filtered_count"], 4);
        assert_eq!(json["parameters"]["ms_tolerance_type"], "ppm");
        assert_eq!(json["stats"]["timings"]["deduplication_ms"], 0);
    }

    #[test]
    fn test_summary_path() {
        assert_eq!(
            summary_path_for(Path::new("/tmp/results.tsv")),
            PathBuf::from("/tmp/results.summary.json")
        );
    }
}
