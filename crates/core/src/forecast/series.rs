//! Grouping of flat historical records into per-item time series.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::types::{GroupedSeries, HistoricalRecord, SeriesKey};

/// Ordered mapping from [`SeriesKey`] to [`GroupedSeries`].
///
/// Iteration follows the order in which each key was first encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesSet {
    series: Vec<GroupedSeries>,
    index: HashMap<SeriesKey, usize>,
}

impl SeriesSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Returns true if no series were built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Borrows the series, in first-encounter order, as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[GroupedSeries] {
        &self.series
    }

    /// Appends a record's quarters to its series, creating it if unseen.
    pub fn push(&mut self, record: &HistoricalRecord) {
        let slot = match self.index.entry(record.key()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                entry.insert(self.series.len());
                self.series.push(GroupedSeries {
                    key,
                    justification: None,
                    last_year: record.year,
                    record_count: 0,
                    observations: Vec::new(),
                });
                self.series.len() - 1
            }
        };

        let series = &mut self.series[slot];
        series.justification.clone_from(&record.justification);
        series.last_year = series.last_year.max(record.year);
        series.record_count += 1;
        series.observations.extend_from_slice(&record.quarters());
    }
}

impl<'a> IntoIterator for &'a SeriesSet {
    type Item = &'a GroupedSeries;
    type IntoIter = std::slice::Iter<'a, GroupedSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// Returns true if `record` passes the optional department filter.
///
/// An absent or empty filter admits every record.
#[must_use]
pub fn department_matches(record: &HistoricalRecord, department: Option<&str>) -> bool {
    match department {
        None | Some("") => true,
        Some(dept) => record.department == dept,
    }
}

/// Groups records into time series keyed by (description, department, category).
///
/// Record order is preserved within each series and determines its chronology.
#[must_use]
pub fn build_series(records: &[HistoricalRecord], department: Option<&str>) -> SeriesSet {
    let mut set = SeriesSet::new();
    for record in records
        .iter()
        .filter(|record| department_matches(record, department))
    {
        set.push(record);
    }
    set
}

/// Lists each non-empty department once, in first-encounter order.
#[must_use]
pub fn distinct_departments(records: &[HistoricalRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .map(|record| record.department.as_str())
        .filter(|dept| !dept.trim().is_empty() && seen.insert(*dept))
        .map(str::to_string)
        .collect()
}
