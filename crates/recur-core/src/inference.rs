//! Recurrence inference.
//!
//! Compresses a pool of occurrences into recurring events:
//! 1. Group occurrences into series by title, location and attendees
//! 2. Detect the period of each series
//! 3. Detect again on the members that period leaves over, so a class held
//!    twice a week becomes two weekly events
//! 4. Attach irregular leftovers to the series' strongest event as
//!    additions, or split them into one-off events if the series has none
//! 5. Sort events by anchor

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::Event;
use crate::grouping::{Series, group_series};
use crate::materialize::{materialize_irregular, materialize_recurring};
use crate::occurrence::Occurrence;
use crate::pattern::PatternError;
use crate::period::{MIN_GRID_MATCHES, detect_period};

/// Configuration for recurrence inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Fewest grid members that make a pattern. Values below 2 act as 2.
    /// Default: 2.
    pub min_grid_matches: usize,

    /// Split a series with no period into one event per occurrence. When
    /// false, such a series becomes one pattern-less event whose other
    /// occurrences are additions. Default: true.
    pub split_irregular_series: bool,

    /// Re-run detection on the members a period leaves over. When false,
    /// they all become additions of the series' single event. Default: true.
    pub split_residual_series: bool,

    /// Most patterned events one series can yield. Each detection round is
    /// quadratic in the series size k, so a series costs at most
    /// O(max_series_events * k^2). Leftovers past the cap become additions.
    /// Values below 1 act as 1. Default: 8.
    pub max_series_events: usize,

    /// Fewest grid members for a leftover sub-series to become its own
    /// event; smaller leftovers stay additions. Any two leftovers of equal
    /// length would otherwise pass as a period. Default: 3.
    pub min_residual_matches: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            min_grid_matches: MIN_GRID_MATCHES,
            split_irregular_series: true,
            split_residual_series: true,
            max_series_events: 8,
            min_residual_matches: 3,
        }
    }
}

/// Errors from recurrence inference.
///
/// Any of these means the engine itself is wrong, not the input: malformed
/// occurrences are already rejected when they are constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("inferred an invalid pattern for {title:?}: {source}")]
    InvalidPattern {
        title: String,
        #[source]
        source: PatternError,
    },
}

/// Counts describing an inference run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InferenceSummary {
    /// Occurrences supplied.
    pub occurrences: usize,
    /// Events produced.
    pub events: usize,
    /// Events with a pattern.
    pub recurring: usize,
    /// Events without a pattern.
    pub one_off: usize,
    /// Pattern instants with no occurrence, over all events.
    pub exceptions: usize,
    /// Off-grid occurrences, over all events.
    pub additions: usize,
}

impl InferenceSummary {
    pub fn from_events(events: &[Event], occurrences: usize) -> Self {
        let recurring = events.iter().filter(|e| e.is_recurring()).count();
        Self {
            occurrences,
            events: events.len(),
            recurring,
            one_off: events.len() - recurring,
            exceptions: events.iter().map(|e| e.exceptions().len()).sum(),
            additions: events.iter().map(|e| e.additions().len()).sum(),
        }
    }

    /// Occurrences per event; 0.0 for an empty run.
    #[expect(
        clippy::cast_precision_loss,
        reason = "counts are far below f64 precision limits"
    )]
    pub fn compression_ratio(&self) -> f64 {
        if self.events == 0 {
            0.0
        } else {
            self.occurrences as f64 / self.events as f64
        }
    }
}

/// Infer recurring events from a pool of occurrences.
///
/// The result is sorted by anchor and does not depend on input order.
/// Re-expanding every event yields each distinct input occurrence exactly
/// once; duplicate occurrences collapse.
pub fn infer(
    occurrences: &[Occurrence],
    config: &InferenceConfig,
) -> Result<Vec<Event>, InferenceError> {
    let series = group_series(occurrences);
    tracing::debug!(
        occurrences = occurrences.len(),
        series = series.len(),
        "grouped occurrences into series"
    );

    let compressed: Vec<Vec<Event>> = series
        .par_iter()
        .map(|s| compress_series(s, config))
        .collect::<Result<_, _>>()?;

    let mut events: Vec<Event> = compressed.into_iter().flatten().collect();
    events.sort();

    let summary = InferenceSummary::from_events(&events, occurrences.len());
    tracing::debug!(?summary, "inferred events");

    Ok(events)
}

/// Compress one series into events.
fn compress_series(series: &Series, config: &InferenceConfig) -> Result<Vec<Event>, InferenceError> {
    let mut pending = series.distinct();
    let mut events = Vec::new();
    let max_events = if config.split_residual_series {
        config.max_series_events.max(1)
    } else {
        1
    };

    while pending.len() >= MIN_GRID_MATCHES && events.len() < max_events {
        let min_matches = if events.is_empty() {
            config.min_grid_matches
        } else {
            config.min_grid_matches.max(config.min_residual_matches)
        };
        let Some(period) = detect_period(&pending, min_matches) else {
            break;
        };

        let title = period.anchor().title().to_string();
        tracing::debug!(
            title = %title,
            interval_ms = period.interval_ms(),
            count = period.count(),
            matched = period.matched(),
            missing = period.missing(),
            "detected period"
        );

        let (members, rest): (Vec<_>, Vec<_>) =
            pending.into_iter().partition(|o| period.contains(o));
        let event = materialize_recurring(&period, members)
            .map_err(|source| InferenceError::InvalidPattern { title, source })?;
        events.push(event);
        pending = rest;
    }

    if pending.is_empty() {
        return Ok(events);
    }

    if let Some(primary) = events.first_mut() {
        tracing::trace!(leftovers = pending.len(), "attaching leftovers as additions");
        primary.extend_additions(pending);
    } else if config.split_irregular_series {
        tracing::trace!(occurrences = pending.len(), "no period, splitting into one-off events");
        events.extend(pending.into_iter().map(Event::single));
    } else {
        let mut rest = pending.into_iter();
        if let Some(anchor) = rest.next() {
            events.push(materialize_irregular(anchor, rest));
        }
    }

    Ok(events)
}
