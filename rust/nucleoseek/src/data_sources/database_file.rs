//! Modification database CSV files.
//!
//! Expected layout, one modification per row:
//!
//! ```text
//! Short Name,[M+H]+,Product ions
//! m1A,282.1197,150.0771
//! Psi,245.0768,209.0557;179.0451;155.0451
//! ```

use crate::errors::DatabaseError;
use crate::models::{
    MergePolicy,
    ModificationDatabase,
    ModificationEntry,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{
    debug,
    info,
};

const REQUIRED_COLUMNS: [&str; 3] = ["Short Name", "[M+H]+", "Product ions"];

#[derive(Debug, Clone, Deserialize)]
struct DatabaseRow {
    #[serde(rename = "Short Name")]
    short_name: String,
    #[serde(rename = "[M+H]+")]
    reference_mass: f64,
    #[serde(rename = "Product ions", default)]
    product_ions: String,
}

impl DatabaseRow {
    fn into_entry(self) -> Result<ModificationEntry, DatabaseError> {
        if !self.reference_mass.is_finite() {
            return Err(DatabaseError::InvalidMass {
                name: self.short_name,
                value: self.reference_mass,
            });
        }
        let ions = parse_product_ions(&self.product_ions).map_err(|token| {
            DatabaseError::InvalidProductIon {
                name: self.short_name.clone(),
                token,
            }
        })?;
        Ok(ModificationEntry::new(self.short_name, self.reference_mass, ions))
    }
}

/// Splits a `;` separated list of masses, skipping empty tokens.
///
/// The unparseable token is returned on failure.
fn parse_product_ions(field: &str) -> Result<Vec<f64>, String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| match t.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(t.to_string()),
        })
        .collect()
}

fn check_columns(headers: &csv::StringRecord) -> Result<(), DatabaseError> {
    let found: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    let matches = found.len() == REQUIRED_COLUMNS.len()
        && REQUIRED_COLUMNS
            .iter()
            .all(|col| found.iter().any(|f| f == col));
    if matches {
        Ok(())
    } else {
        Err(DatabaseError::InvalidColumns { found })
    }
}

/// Parses a database from any CSV source.
pub fn read_database<R: Read>(source: R) -> Result<ModificationDatabase, DatabaseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    check_columns(rdr.headers()?)?;

    let mut db = ModificationDatabase::new();
    for result in rdr.deserialize() {
        let row: DatabaseRow = result?;
        db.insert(row.into_entry()?)?;
    }
    Ok(db)
}

pub fn read_database_file<T: AsRef<Path>>(file: T) -> Result<ModificationDatabase, DatabaseError> {
    let path = file.as_ref();
    let file_handle = std::fs::File::open(path).map_err(|source| DatabaseError::FileOpen {
        source,
        path: path.to_path_buf(),
    })?;
    let db = read_database(file_handle)?;
    info!("Read {} modifications from {}", db.len(), path.display());
    Ok(db)
}

/// Reads and merges several database files, in order.
pub fn read_database_files<T: AsRef<Path>>(
    files: &[T],
    policy: MergePolicy,
) -> Result<ModificationDatabase, DatabaseError> {
    let mut merged = ModificationDatabase::new();
    for file in files {
        let db = read_database_file(file)?;
        let total = db.len();
        let added = merged.merge(db, policy)?;
        debug!(
            "Merged {} of {} modifications from {}",
            added,
            total,
            file.as_ref().display()
        );
    }
    Ok(merged)
}
