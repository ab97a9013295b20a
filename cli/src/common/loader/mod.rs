//! # EvType Dataset Loaders (`common::loader`)
//!
//! File: cli/src/common/loader/mod.rs
//!
//! ## Overview
//!
//! Loaders turn an external source into a `Dataset`. They are the only place
//! that knows about files, archives and CSV columns; the predictor core only
//! ever sees normalized `VehicleRecord`s.
//!
//! ## Architecture
//!
//! - `DatasetLoader`: the capability the front-ends depend on
//! - `csv_file::CsvFileLoader`: a CSV file on disk (the bundled dataset)
//! - `upload::ArchiveLoader`: an uploaded file held in memory (`.csv`,
//!   `.csv.gz`, `.tar`, `.tar.gz`/`.tgz`)
//! - `loader_for_path`: picks a loader from a file name
//!
//! ## Examples
//!
//! ```rust
//! let loader = loader::loader_for_path(Path::new("Electric_Vehicle_Population_Data.csv"))?;
//! info!("Loading {}", loader.describe());
//! let dataset = loader.load()?;
//! ```
//!
use crate::core::error::{EvError, Result};
use crate::predictor::Dataset;
use std::path::Path;

pub mod csv_file;
pub mod upload;

pub use csv_file::CsvFileLoader;
pub use upload::ArchiveLoader;

/// Column headers the loaders read. Matching ignores surrounding whitespace and ASCII case.
pub const MAKE_COLUMN: &str = "Make";
pub const MODEL_COLUMN: &str = "Model";
pub const EV_TYPE_COLUMN: &str = "Electric Vehicle Type";
pub const RANGE_COLUMN: &str = "Electric Range";

/// Something that can produce a fresh `Dataset`.
pub trait DatasetLoader: Send + Sync {
    /// Human-readable origin, e.g. a path or an upload name.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Dataset>;
}

/// Source formats recognised from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    GzipCsv,
    Tar,
    TarGz,
}

impl DatasetFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(DatasetFormat::TarGz)
        } else if lower.ends_with(".gz") {
            Some(DatasetFormat::GzipCsv)
        } else if lower.ends_with(".tar") {
            Some(DatasetFormat::Tar)
        } else if lower.ends_with(".csv") {
            Some(DatasetFormat::Csv)
        } else {
            None
        }
    }
}

/// Chooses a loader for a dataset on disk. Archives are read into memory up front.
///
/// ## Arguments
///
/// * `path`: Dataset file; its name decides the format.
///
/// ## Returns
///
/// * `Result<Box<dyn DatasetLoader>>`: A streaming loader for plain `.csv`,
///   otherwise an in-memory `ArchiveLoader`.
///
/// ## Errors
///
/// Returns `EvError::UnsupportedFormat` for unknown extensions, or an I/O error
/// if an archive cannot be read.
pub fn loader_for_path(path: &Path) -> Result<Box<dyn DatasetLoader>> {
    let name = path.to_string_lossy();
    match DatasetFormat::from_name(&name) {
        Some(DatasetFormat::Csv) => Ok(Box::new(CsvFileLoader::new(path))),
        Some(_) => Ok(Box::new(ArchiveLoader::from_path(path)?)),
        None => Err(EvError::UnsupportedFormat {
            name: name.into_owned(),
        }
        .into()),
    }
}

/// Loads the dataset at `path`, logging a short summary.
///
/// ## Errors
///
/// See `loader_for_path` and `DatasetLoader::load`.
pub fn load_from_path(path: &Path) -> Result<Dataset> {
    let loader = loader_for_path(path)?;
    tracing::info!("Loading dataset from {}", loader.describe());
    let dataset = loader.load()?;
    let summary = dataset.summary();
    tracing::info!(
        "Loaded {} vehicle record(s) across {} type label(s)",
        summary.records,
        summary.types.len()
    );
    if dataset.is_empty() {
        tracing::warn!("Dataset '{}' contains no usable rows", dataset.source());
    }
    Ok(dataset)
}
