//! Period detection.
//!
//! Finds the interval and anchor that put the most occurrences of a series
//! on one grid `anchor + n * interval`.
//!
//! # Algorithm Summary
//!
//! 1. Collapse duplicates (same start and end)
//! 2. Collect the start gaps between every pair of equal-length occurrences;
//!    the most frequent gap is the interval, ties going to the smallest gap
//! 3. Score each occurrence as a trial anchor by counting the occurrences a
//!    whole number of intervals away (before or after) with the same length;
//!    the highest score wins, ties going to the earliest anchor
//! 4. Below `min_matches` grid members the series has no period
//! 5. The pattern counts grid points from the anchor to the last member
//!
//! Occurrences of a different length never sit on the grid, so they are
//! also left out of the gap counts in step 2.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::TimeDelta;

use crate::occurrence::Occurrence;
use crate::pattern::{EventPattern, PatternError};

/// The fewest grid members that count as a repetition.
pub const MIN_GRID_MATCHES: usize = 2;

/// A period found in a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedPeriod {
    interval: TimeDelta,
    anchor: Occurrence,
    count: u32,
    matched: usize,
}

impl DetectedPeriod {
    pub const fn interval(&self) -> TimeDelta {
        self.interval
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval.num_milliseconds()
    }

    /// The earliest occurrence on the grid.
    pub const fn anchor(&self) -> &Occurrence {
        &self.anchor
    }

    /// Grid points from the anchor to the last member, inclusive.
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Number of distinct occurrences on the grid.
    pub const fn matched(&self) -> usize {
        self.matched
    }

    /// Number of grid points with no occurrence.
    pub fn missing(&self) -> usize {
        (self.count as usize).saturating_sub(self.matched)
    }

    /// Whether `occurrence` is one of the grid members this period describes.
    pub fn contains(&self, occurrence: &Occurrence) -> bool {
        if !occurrence.is_descriptively_equal(&self.anchor)
            || occurrence.duration() != self.anchor.duration()
        {
            return false;
        }
        let interval_ms = self.interval_ms();
        let offset_ms = (occurrence.start() - self.anchor.start()).num_milliseconds();
        offset_ms >= 0
            && offset_ms % interval_ms == 0
            && offset_ms / interval_ms < i64::from(self.count)
    }

    /// The count-terminated pattern for this period.
    pub fn pattern(&self) -> Result<EventPattern, PatternError> {
        EventPattern::with_count(self.interval, self.count)
    }
}

/// Detect the period of a series.
///
/// `occurrences` should be descriptively equal; duplicates are tolerated.
/// Returns `None` when fewer than `min_matches` (never less than
/// [`MIN_GRID_MATCHES`]) occurrences share a grid.
pub fn detect_period(occurrences: &[Occurrence], min_matches: usize) -> Option<DetectedPeriod> {
    let mut distinct: Vec<&Occurrence> = occurrences.iter().collect();
    distinct.sort();
    distinct.dedup();

    if distinct.len() < MIN_GRID_MATCHES {
        return None;
    }

    let Some(interval_ms) = modal_gap(&distinct) else {
        tracing::trace!(
            occurrences = distinct.len(),
            "no equal-length pairs, series has no period"
        );
        return None;
    };

    let members = best_grid(&distinct, interval_ms);
    if members.len() < min_matches.max(MIN_GRID_MATCHES) {
        tracing::trace!(
            interval_ms,
            matched = members.len(),
            "too few grid members, series has no period"
        );
        return None;
    }

    let anchor = members[0];
    let last = members[members.len() - 1];
    let steps = (last.start() - anchor.start()).num_milliseconds() / interval_ms;
    let Ok(count) = u32::try_from(steps + 1) else {
        tracing::warn!(interval_ms, steps, "pattern too long to count, series has no period");
        return None;
    };

    tracing::trace!(
        interval_ms,
        count,
        matched = members.len(),
        anchor = %anchor.start(),
        "detected period"
    );

    Some(DetectedPeriod {
        interval: TimeDelta::milliseconds(interval_ms),
        anchor: anchor.clone(),
        count,
        matched: members.len(),
    })
}

/// The most frequent start gap between equal-length occurrences.
///
/// Ties go to the smallest gap. `None` if no pair has equal length.
fn modal_gap(distinct: &[&Occurrence]) -> Option<i64> {
    let mut frequencies: HashMap<i64, usize> = HashMap::new();

    for (i, earlier) in distinct.iter().enumerate() {
        for later in &distinct[i + 1..] {
            if later.duration() != earlier.duration() {
                continue;
            }
            let gap_ms = (later.start() - earlier.start()).num_milliseconds();
            if gap_ms > 0 {
                *frequencies.entry(gap_ms).or_insert(0) += 1;
            }
        }
    }

    frequencies
        .into_iter()
        .max_by_key(|&(gap_ms, n)| (n, Reverse(gap_ms)))
        .map(|(gap_ms, _)| gap_ms)
}

/// Members of the best-populated grid with spacing `interval_ms`.
///
/// Every occurrence is tried as an anchor. The first trial to reach the
/// best score is kept, so the winner is always the earliest member of its
/// grid and sits at index 0 of the result.
fn best_grid<'a>(distinct: &[&'a Occurrence], interval_ms: i64) -> Vec<&'a Occurrence> {
    let mut best: Vec<&Occurrence> = Vec::new();

    for trial in distinct {
        let members: Vec<&Occurrence> = distinct
            .iter()
            .copied()
            .filter(|other| on_grid(trial, other, interval_ms))
            .collect();
        if members.len() > best.len() {
            best = members;
        }
    }

    best
}

fn on_grid(anchor: &Occurrence, other: &Occurrence, interval_ms: i64) -> bool {
    other.duration() == anchor.duration()
        && (other.start() - anchor.start())
            .num_milliseconds()
            .rem_euclid(interval_ms)
            == 0
}
