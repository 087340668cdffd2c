//! Concrete scheduled instances, as supplied by the timetable scraper.

use std::collections::BTreeSet;

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::{AttendeeId, ValidationError};

/// One concrete scheduled instance of a lesson, break or meeting.
///
/// Occurrences are immutable once constructed. Two occurrences are
/// *descriptively equal* when their [`Descriptor`]s match; times are not
/// part of that comparison.
///
/// The derived ordering is chronological (start, then end) with the
/// descriptive fields as a final tie-break, so sorting a pool of
/// occurrences yields a stable time order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "OccurrenceRecord")]
pub struct Occurrence {
    start: NaiveDateTime,
    end: NaiveDateTime,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    attendees: BTreeSet<AttendeeId>,
}

/// The time-independent identity of an occurrence.
///
/// Used as the grouping key: occurrences with equal descriptors belong to
/// the same candidate series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Descriptor<'a> {
    pub title: &'a str,
    pub location: Option<&'a str>,
    pub attendees: &'a BTreeSet<AttendeeId>,
}

impl Occurrence {
    /// Creates an occurrence, rejecting ones that do not end after they start.
    ///
    /// Times must be whole milliseconds: every interval and offset the
    /// engine derives is in milliseconds and must be exact.
    ///
    /// An empty title is allowed and means "no subject recorded".
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        title: impl Into<String>,
        location: Option<String>,
        attendees: impl IntoIterator<Item = AttendeeId>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if end <= start {
            return Err(ValidationError::MalformedOccurrence { title, start, end });
        }
        if let Some(at) = [start, end].into_iter().find(|t| t.nanosecond() % 1_000_000 != 0) {
            return Err(ValidationError::SubMillisecond { title, at });
        }
        Ok(Self {
            start,
            end,
            title,
            location,
            attendees: attendees.into_iter().collect(),
        })
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub const fn attendees(&self) -> &BTreeSet<AttendeeId> {
        &self.attendees
    }

    /// Length of the occurrence. Always positive.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Length of the occurrence in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.duration().num_milliseconds()
    }

    /// Returns the grouping key of this occurrence.
    pub fn descriptor(&self) -> Descriptor<'_> {
        Descriptor {
            title: &self.title,
            location: self.location.as_deref(),
            attendees: &self.attendees,
        }
    }

    /// Whether `other` has the same title, location and attendees.
    pub fn is_descriptively_equal(&self, other: &Self) -> bool {
        self.descriptor() == other.descriptor()
    }

    /// Returns a copy moved to `start`, keeping its duration and descriptor.
    ///
    /// Returns `None` if the new end would overflow the calendar.
    pub fn rescheduled(&self, start: NaiveDateTime) -> Option<Self> {
        let end = start.checked_add_signed(self.duration())?;
        Some(Self {
            start,
            end,
            title: self.title.clone(),
            location: self.location.clone(),
            attendees: self.attendees.clone(),
        })
    }
}

/// Wire shape of an occurrence before validation.
#[derive(Deserialize)]
struct OccurrenceRecord {
    start: NaiveDateTime,
    end: NaiveDateTime,
    #[serde(default)]
    title: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    attendees: BTreeSet<AttendeeId>,
}

impl TryFrom<OccurrenceRecord> for Occurrence {
    type Error = ValidationError;

    fn try_from(record: OccurrenceRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.start,
            record.end,
            record.title,
            record.location,
            record.attendees,
        )
    }
}
