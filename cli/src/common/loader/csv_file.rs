//! # CSV Dataset Loader
//!
//! File: cli/src/common/loader/csv_file.rs
//!
//! Reads the vehicle population CSV. Columns are located by header name, so
//! extra columns and any column order are fine. Row handling:
//!
//! - `Make` / `Model`: whitespace-normalized and lowercased; rows where either
//!   is empty are dropped with a warning
//! - `Electric Vehicle Type`: trimmed
//! - `Electric Range`: parsed as a number; missing, unparseable, negative or
//!   non-finite values become 0
//!
use super::{DatasetLoader, EV_TYPE_COLUMN, MAKE_COLUMN, MODEL_COLUMN, RANGE_COLUMN};
use crate::core::error::{EvError, Result};
use crate::predictor::{Dataset, VehicleRecord};
use anyhow::Context;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads a CSV file from disk.
#[derive(Debug, Clone)]
pub struct CsvFileLoader {
    path: PathBuf,
}

impl CsvFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetLoader for CsvFileLoader {
    fn describe(&self) -> String {
        self.path().display().to_string()
    }

    fn load(&self) -> Result<Dataset> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open dataset file: {}", self.path.display()))?;
        let records = parse_records(file)
            .with_context(|| format!("Failed to load dataset: {}", self.path.display()))?;
        Ok(Dataset::new(self.describe(), records))
    }
}

/// Column positions resolved from the header row.
struct Columns {
    make: usize,
    model: usize,
    ev_type: usize,
    range: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    EvError::MissingColumn {
                        column: name.to_string(),
                    }
                    .into()
                })
        };
        Ok(Self {
            make: find(MAKE_COLUMN)?,
            model: find(MODEL_COLUMN)?,
            ev_type: find(EV_TYPE_COLUMN)?,
            range: find(RANGE_COLUMN)?,
        })
    }
}

/// Parses CSV data with a header row into normalized records, in source order.
///
/// ## Arguments
///
/// * `reader`: CSV bytes; only `Make`, `Model`, `Electric Vehicle Type` and
///   `Electric Range` are read.
///
/// ## Returns
///
/// * `Result<Vec<VehicleRecord>>`: One record per data row with a non-empty
///   make and model. Short rows are read with blanks for the missing fields.
///
/// ## Errors
///
/// Returns `EvError::MissingColumn` if a required header is absent, or
/// `EvError::Csv` if the input is not valid CSV (for example, invalid UTF-8).
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<VehicleRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers().map_err(EvError::from)?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (idx, result) in reader.records().enumerate() {
        let row = result
            .map_err(EvError::from)
            .with_context(|| format!("Failed to read row {}", idx + 1))?;
        let field = |pos: usize| row.get(pos).unwrap_or("");

        let record = VehicleRecord::new(
            field(columns.make),
            field(columns.model),
            field(columns.ev_type),
            coerce_range(field(columns.range)),
        );
        if record.make.is_empty() || record.model.is_empty() {
            debug!("Dropping row {}: empty make or model", idx + 1);
            dropped += 1;
            continue;
        }
        records.push(record);
    }

    if dropped > 0 {
        warn!("Dropped {} row(s) with an empty make or model", dropped);
    }
    Ok(records)
}

/// Numeric coercion for `Electric Range`; anything unusable becomes 0.
pub fn coerce_range(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
VIN (1-10),County,Make,Model,Electric Vehicle Type,Electric Range
5YJ3E1EA7K,King,TESLA,MODEL 3,Battery Electric Vehicle (BEV),220
1N4AZ0CP5D,King, NISSAN , LEAF ,Battery Electric Vehicle (BEV),75
JTDKARFP1J,Pierce,TOYOTA,PRIUS PRIME,Plug-in Hybrid Electric Vehicle (PHEV),
";

    #[test]
    fn test_parse_records_normalizes_fields() -> Result<()> {
        let records = parse_records(SAMPLE.as_bytes())?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].lookup_key(), "tesla model 3");
        assert_eq!(records[1].make, "nissan");
        assert_eq!(records[1].model, "leaf");
        assert_eq!(records[1].electric_range, 75.0);
        assert_eq!(records[2].ev_type, "Plug-in Hybrid Electric Vehicle (PHEV)");
        assert_eq!(records[2].electric_range, 0.0);
        Ok(())
    }

    #[test]
    fn test_column_order_and_header_case_do_not_matter() -> Result<()> {
        let data = "electric range , MODEL,make,Electric Vehicle Type\n32,Niro,KIA,PHEV\n";
        let records = parse_records(data.as_bytes())?;
        assert_eq!(records[0].lookup_key(), "kia niro");
        assert_eq!(records[0].electric_range, 32.0);
        Ok(())
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let data = "Make,Model,Electric Range\nKIA,NIRO,26\n";
        let err = parse_records(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvError>(),
            Some(EvError::MissingColumn { column }) if column == EV_TYPE_COLUMN
        ));
    }

    #[test]
    fn test_short_and_empty_rows_are_handled() -> Result<()> {
        let data = "Make,Model,Electric Vehicle Type,Electric Range\nKIA,NIRO\n,LEAF,BEV,80\nAUDI,,BEV,200\n";
        let records = parse_records(data.as_bytes())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ev_type, "");
        assert_eq!(records[0].electric_range, 0.0);
        Ok(())
    }

    #[test]
    fn test_coerce_range() {
        assert_eq!(coerce_range("272"), 272.0);
        assert_eq!(coerce_range(" 25.5 "), 25.5);
        assert_eq!(coerce_range(""), 0.0);
        assert_eq!(coerce_range("n/a"), 0.0);
        assert_eq!(coerce_range("-10"), 0.0);
        assert_eq!(coerce_range("NaN"), 0.0);
        assert_eq!(coerce_range("inf"), 0.0);
    }

    #[test]
    fn test_csv_file_loader() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("vehicles.csv");
        fs::write(&path, SAMPLE)?;

        let loader = CsvFileLoader::new(&path);
        let dataset = loader.load()?;
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.source(), path.display().to_string());
        Ok(())
    }

    #[test]
    fn test_csv_file_loader_missing_file() {
        let loader = CsvFileLoader::new("/definitely/not/here.csv");
        assert!(loader.load().is_err());
    }
}
