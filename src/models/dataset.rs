use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ProcessingError, Result};
use crate::models::MeterRecord;

/// All normalized readings of a run, ascending by timestamp. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedDataset {
    records: Vec<MeterRecord>,
}

impl UnifiedDataset {
    /// Build the dataset, sorting by timestamp. Ties keep their input order,
    /// so rows from earlier source files stay first.
    pub fn new(mut records: Vec<MeterRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(ProcessingError::EmptyDataset);
        }

        records.sort_by_key(|r| r.timestamp);
        Ok(Self { records })
    }

    pub fn records(&self) -> &[MeterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeterRecord> {
        self.records.iter()
    }

    /// `(building, timestamp, kwh)` view consumed by the object model
    pub fn triples(&self) -> impl Iterator<Item = (&str, NaiveDateTime, f64)> + '_ {
        self.records
            .iter()
            .map(|r| (r.building.as_str(), r.timestamp, r.kwh))
    }

    /// Distinct building names, sorted
    pub fn buildings(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.building.as_str()).collect()
    }

    /// Readings per building, sorted by building name
    pub fn building_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.building.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub fn time_span(&self) -> (NaiveDateTime, NaiveDateTime) {
        // Non-empty and sorted by construction
        let first = self.records[0].timestamp;
        let last = self.records[self.records.len() - 1].timestamp;
        (first, last)
    }
}

impl AsRef<[MeterRecord]> for UnifiedDataset {
    fn as_ref(&self) -> &[MeterRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a UnifiedDataset {
    type Item = &'a MeterRecord;
    type IntoIter = std::slice::Iter<'a, MeterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
