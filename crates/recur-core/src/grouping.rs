//! Series grouping.
//!
//! Partitions an occurrence pool into candidate series: runs of
//! descriptively equal occurrences (same title, location and attendees),
//! each sorted by start. Sort-then-partition on the descriptor keeps this
//! at O(N log N).

use crate::occurrence::{Descriptor, Occurrence};

/// A time-ordered run of descriptively equal occurrences.
///
/// Duplicates (identical start and end) are kept as supplied; use
/// [`Series::distinct`] to collapse them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    occurrences: Vec<Occurrence>,
}

impl Series {
    /// Wraps occurrences that are already sorted and descriptively equal.
    pub(crate) fn from_sorted(occurrences: Vec<Occurrence>) -> Self {
        debug_assert!(occurrences.is_sorted());
        debug_assert!(
            occurrences
                .windows(2)
                .all(|pair| pair[0].is_descriptively_equal(&pair[1]))
        );
        Self { occurrences }
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// The descriptor shared by every member, or `None` for an empty series.
    pub fn descriptor(&self) -> Option<Descriptor<'_>> {
        self.occurrences.first().map(Occurrence::descriptor)
    }

    /// The members with duplicates collapsed, still in time order.
    pub fn distinct(&self) -> Vec<Occurrence> {
        let mut distinct = self.occurrences.clone();
        distinct.dedup();
        distinct
    }
}

/// Partition `occurrences` into series.
///
/// Every input occurrence lands in exactly one series. Series are returned
/// ordered by descriptor, so the result does not depend on input order.
pub fn group_series(occurrences: &[Occurrence]) -> Vec<Series> {
    let mut sorted: Vec<&Occurrence> = occurrences.iter().collect();
    sorted.sort_by(|a, b| a.descriptor().cmp(&b.descriptor()).then_with(|| a.cmp(b)));

    sorted
        .chunk_by(|a, b| a.is_descriptively_equal(b))
        .map(|run| Series::from_sorted(run.iter().map(|&o| o.clone()).collect()))
        .collect()
}
