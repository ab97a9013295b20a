//! # Vehicle Lookup
//!
//! File: cli/src/predictor/lookup.rs
//!
//! Plain substring matching of a normalized make/model query against the
//! `"<make> <model>"` key of every record. Broad queries are intentionally
//! permissive: `"ford"` matches every Ford, and `"d mo"` matches any key that
//! happens to contain that fragment.
//!
use super::dataset::{normalize_text, Dataset, VehicleRecord};

/// Read-only view over a dataset that answers make/model queries.
#[derive(Debug, Clone, Copy)]
pub struct VehicleLookup<'a> {
    dataset: &'a Dataset,
}

/// A non-empty set of matching records, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSet<'a> {
    records: Vec<&'a VehicleRecord>,
}

impl<'a> VehicleLookup<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Returns every record whose key contains the normalized query, or `None`.
    pub fn find(&self, query: &str) -> Option<MatchSet<'a>> {
        let needle = normalize_text(query);
        let records: Vec<&'a VehicleRecord> = self
            .dataset
            .keyed_records()
            .filter(|(key, _)| key.contains(needle.as_str()))
            .map(|(_, record)| record)
            .collect();

        if records.is_empty() {
            None
        } else {
            Some(MatchSet { records })
        }
    }
}

impl<'a> MatchSet<'a> {
    /// The first match; its type label stands for the whole set.
    pub fn representative(&self) -> &'a VehicleRecord {
        self.records[0]
    }

    /// Arithmetic mean of `electric_range` across all matches.
    pub fn average_range(&self) -> f64 {
        let total: f64 = self.records.iter().map(|r| r.electric_range).sum();
        total / self.records.len() as f64
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a VehicleRecord> + '_ {
        self.records.iter().copied()
    }
}
