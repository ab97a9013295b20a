//! # Vehicle Dataset
//!
//! File: cli/src/predictor/dataset.rs
//!
//! ## Overview
//!
//! The in-memory, read-only record set the predictor answers from. A `Dataset`
//! is built once by a loader (see `common::loader`) and then only borrowed; a
//! new upload produces a fresh `Dataset` that replaces the old one as a whole.
//!
//! Every record carries a precomputed lookup key, `"<make> <model>"`, so a
//! lookup is a single linear scan of substring tests.
//!
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the vehicle population dataset, already normalized by the loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub make: String,
    pub model: String,
    pub ev_type: String,
    /// Miles. Invalid or missing source values are stored as 0.
    pub electric_range: f64,
}

impl VehicleRecord {
    /// Builds a record, applying the same normalization the lookup uses for queries.
    pub fn new(make: &str, model: &str, ev_type: &str, electric_range: f64) -> Self {
        Self {
            make: normalize_text(make),
            model: normalize_text(model),
            ev_type: ev_type.trim().to_string(),
            electric_range,
        }
    }

    /// The string a lookup query is matched against.
    pub fn lookup_key(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// Collapses whitespace runs to a single space, trims, and lowercases.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Immutable, ordered collection of vehicle records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    source: String,
    records: Vec<VehicleRecord>,
    keys: Vec<String>,
}

/// Counts reported by `Dataset::summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub source: String,
    pub records: usize,
    /// Record count per vehicle type label, sorted by label.
    pub types: BTreeMap<String, usize>,
}

impl Dataset {
    /// Wraps loaded records. `source` is a human-readable origin used in logs and the UI.
    pub fn new(source: impl Into<String>, records: Vec<VehicleRecord>) -> Self {
        let keys = records.iter().map(VehicleRecord::lookup_key).collect();
        Self {
            source: source.into(),
            records,
            keys,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    /// Records paired with their lookup keys, in source order.
    pub(crate) fn keyed_records(&self) -> impl Iterator<Item = (&str, &VehicleRecord)> {
        self.keys.iter().map(String::as_str).zip(self.records.iter())
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut types = BTreeMap::new();
        for record in &self.records {
            *types.entry(record.ev_type.clone()).or_insert(0) += 1;
        }
        DatasetSummary {
            source: self.source.clone(),
            records: self.records.len(),
            types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Tesla \t Model   3 "), "tesla model 3");
        assert_eq!(normalize_text("\n"), "");
        assert_eq!(normalize_text("BMW"), "bmw");
    }

    #[test]
    fn test_record_normalizes_fields() {
        let record = VehicleRecord::new(" TESLA ", "Model  Y", " Battery Electric Vehicle (BEV) ", 291.0);
        assert_eq!(record.make, "tesla");
        assert_eq!(record.model, "model y");
        assert_eq!(record.ev_type, "Battery Electric Vehicle (BEV)");
        assert_eq!(record.lookup_key(), "tesla model y");
    }

    #[test]
    fn test_summary_counts_types() {
        let dataset = Dataset::new(
            "fixture",
            vec![
                VehicleRecord::new("tesla", "model 3", "BEV", 272.0),
                VehicleRecord::new("toyota", "prius prime", "PHEV", 25.0),
                VehicleRecord::new("nissan", "leaf", "BEV", 150.0),
            ],
        );

        let summary = dataset.summary();
        assert_eq!(summary.source, "fixture");
        assert_eq!(summary.records, 3);
        assert_eq!(summary.types.get("BEV"), Some(&2));
        assert_eq!(summary.types.get("PHEV"), Some(&1));
    }

    #[test]
    fn test_keyed_records_preserve_order() {
        let dataset = Dataset::new(
            "fixture",
            vec![
                VehicleRecord::new("kia", "niro", "PHEV", 26.0),
                VehicleRecord::new("audi", "e-tron", "BEV", 222.0),
            ],
        );
        let keys: Vec<&str> = dataset.keyed_records().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["kia niro", "audi e-tron"]);
    }
}
