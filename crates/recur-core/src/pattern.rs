//! Fixed-interval repetition rules.
//!
//! An [`EventPattern`] is an interval plus exactly one termination: a
//! repetition count (including the anchor) or an inclusive `until` bound,
//! mirroring the COUNT/UNTIL exclusivity of RFC 5545 recurrence rules.

use std::num::NonZeroU32;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing an [`EventPattern`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Both `count` and `until` were given.
    #[error("a pattern takes either a count or an until bound, not both")]
    AmbiguousTermination,

    /// Neither `count` nor `until` was given.
    #[error("a pattern needs either a count or an until bound")]
    MissingTermination,

    /// A count of zero repetitions.
    #[error("pattern count must be positive")]
    ZeroCount,

    /// The interval was zero, negative or unrepresentable.
    #[error("pattern interval must be positive, got {interval_ms}ms")]
    NonPositiveInterval { interval_ms: i64 },
}

/// How a pattern stops repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Termination {
    /// Number of instants, anchor included.
    Count(NonZeroU32),
    /// Last permitted start, inclusive.
    Until(NaiveDateTime),
}

/// A fixed-interval repetition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PatternRecord", into = "PatternRecord")]
pub struct EventPattern {
    interval: TimeDelta,
    termination: Termination,
}

impl EventPattern {
    /// Creates a pattern from an interval and exactly one of `count` or `until`.
    pub fn new(
        interval: TimeDelta,
        count: Option<u32>,
        until: Option<NaiveDateTime>,
    ) -> Result<Self, PatternError> {
        if interval <= TimeDelta::zero() {
            return Err(PatternError::NonPositiveInterval {
                interval_ms: interval.num_milliseconds(),
            });
        }

        let termination = match (count, until) {
            (Some(_), Some(_)) => return Err(PatternError::AmbiguousTermination),
            (None, None) => return Err(PatternError::MissingTermination),
            (Some(count), None) => {
                Termination::Count(NonZeroU32::new(count).ok_or(PatternError::ZeroCount)?)
            }
            (None, Some(until)) => Termination::Until(until),
        };

        Ok(Self {
            interval,
            termination,
        })
    }

    /// Creates a count-terminated pattern.
    pub fn with_count(interval: TimeDelta, count: u32) -> Result<Self, PatternError> {
        Self::new(interval, Some(count), None)
    }

    /// Creates an until-terminated pattern.
    pub fn with_until(interval: TimeDelta, until: NaiveDateTime) -> Result<Self, PatternError> {
        Self::new(interval, None, Some(until))
    }

    pub const fn interval(&self) -> TimeDelta {
        self.interval
    }

    pub fn interval_ms(&self) -> i64 {
        self.interval.num_milliseconds()
    }

    pub const fn termination(&self) -> Termination {
        self.termination
    }

    pub const fn count(&self) -> Option<u32> {
        match self.termination {
            Termination::Count(count) => Some(count.get()),
            Termination::Until(_) => None,
        }
    }

    pub const fn until(&self) -> Option<NaiveDateTime> {
        match self.termination {
            Termination::Count(_) => None,
            Termination::Until(until) => Some(until),
        }
    }

    /// Enumerates the grid `anchor + n * interval`, anchor first.
    pub const fn instants(&self, anchor: NaiveDateTime) -> Instants {
        Instants {
            next: Some(anchor),
            interval: self.interval,
            termination: self.termination,
            emitted: 0,
        }
    }

    /// Rewrites a count-terminated pattern as the equivalent until bound.
    ///
    /// The bound is the last instant of the grid starting at `anchor`.
    /// Until-terminated patterns are returned unchanged.
    #[must_use]
    pub fn to_until(&self, anchor: NaiveDateTime) -> Self {
        match self.termination {
            Termination::Until(_) => *self,
            Termination::Count(_) => self.instants(anchor).last().map_or(*self, |last| Self {
                interval: self.interval,
                termination: Termination::Until(last),
            }),
        }
    }
}

/// Iterator over the instants of a pattern. See [`EventPattern::instants`].
#[derive(Debug, Clone)]
pub struct Instants {
    next: Option<NaiveDateTime>,
    interval: TimeDelta,
    termination: Termination,
    emitted: u32,
}

impl Iterator for Instants {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let done = match self.termination {
            Termination::Count(count) => self.emitted >= count.get(),
            Termination::Until(until) => current > until,
        };
        if done {
            self.next = None;
            return None;
        }

        self.emitted = self.emitted.saturating_add(1);
        self.next = current.checked_add_signed(self.interval);
        Some(current)
    }
}

/// Wire shape of a pattern: interval in milliseconds plus one termination.
#[derive(Serialize, Deserialize)]
struct PatternRecord {
    interval_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    until: Option<NaiveDateTime>,
}

impl From<EventPattern> for PatternRecord {
    fn from(pattern: EventPattern) -> Self {
        Self {
            interval_ms: pattern.interval_ms(),
            count: pattern.count(),
            until: pattern.until(),
        }
    }
}

impl TryFrom<PatternRecord> for EventPattern {
    type Error = PatternError;

    fn try_from(record: PatternRecord) -> Result<Self, Self::Error> {
        let interval = TimeDelta::try_milliseconds(record.interval_ms).ok_or(
            PatternError::NonPositiveInterval {
                interval_ms: record.interval_ms,
            },
        )?;
        Self::new(interval, record.count, record.until)
    }
}
