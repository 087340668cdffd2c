//! Compressed descriptions of a series.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::occurrence::Occurrence;
use crate::pattern::EventPattern;

/// A series compressed into anchor, pattern, exceptions and additions.
///
/// Re-expanding an event ([`Event::occurrences`]) yields exactly the
/// occurrences it was built from: the anchor, every pattern instant not
/// listed in `exceptions`, and every addition.
///
/// Events are only built by the materializer and are read-only afterwards,
/// which is why this type serializes for export but does not deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Event {
    anchor: Occurrence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<EventPattern>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    exceptions: BTreeSet<NaiveDateTime>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    additions: BTreeSet<Occurrence>,
}

impl Event {
    /// A non-recurring event made of one occurrence.
    pub fn single(occurrence: Occurrence) -> Self {
        Self {
            anchor: occurrence,
            pattern: None,
            exceptions: BTreeSet::new(),
            additions: BTreeSet::new(),
        }
    }

    pub(crate) fn from_parts(
        anchor: Occurrence,
        pattern: Option<EventPattern>,
        exceptions: BTreeSet<NaiveDateTime>,
        additions: BTreeSet<Occurrence>,
    ) -> Self {
        debug_assert!(additions.iter().all(|o| o.is_descriptively_equal(&anchor)));
        Self {
            anchor,
            pattern,
            exceptions,
            additions,
        }
    }

    /// Adds off-grid occurrences of the same series.
    pub(crate) fn extend_additions(&mut self, occurrences: impl IntoIterator<Item = Occurrence>) {
        for occurrence in occurrences {
            debug_assert!(occurrence.is_descriptively_equal(&self.anchor));
            if occurrence != self.anchor {
                self.additions.insert(occurrence);
            }
        }
    }

    pub const fn anchor(&self) -> &Occurrence {
        &self.anchor
    }

    pub const fn pattern(&self) -> Option<&EventPattern> {
        self.pattern.as_ref()
    }

    /// Pattern instants with no real occurrence.
    pub const fn exceptions(&self) -> &BTreeSet<NaiveDateTime> {
        &self.exceptions
    }

    /// Real occurrences that are not on the pattern grid.
    pub const fn additions(&self) -> &BTreeSet<Occurrence> {
        &self.additions
    }

    pub const fn is_recurring(&self) -> bool {
        self.pattern.is_some()
    }

    /// Re-expands the event into its occurrences, sorted by time.
    pub fn occurrences(&self) -> Vec<Occurrence> {
        let mut expanded: Vec<Occurrence> = match &self.pattern {
            Some(pattern) => pattern
                .instants(self.anchor.start())
                .filter(|instant| !self.exceptions.contains(instant))
                .filter_map(|instant| self.anchor.rescheduled(instant))
                .collect(),
            None => vec![self.anchor.clone()],
        };
        expanded.extend(self.additions.iter().cloned());
        expanded.sort();
        expanded
    }

    /// The same event with its pattern bounded by an `until` instant instead
    /// of a count. It expands to the same occurrences.
    #[must_use]
    pub fn to_until(&self) -> Self {
        Self {
            pattern: self.pattern.map(|pattern| pattern.to_until(self.anchor.start())),
            ..self.clone()
        }
    }

    /// Start of the latest occurrence this event describes.
    pub fn last_start(&self) -> NaiveDateTime {
        let grid_last = self.pattern.as_ref().and_then(|pattern| {
            pattern
                .instants(self.anchor.start())
                .filter(|instant| !self.exceptions.contains(instant))
                .last()
        });
        let addition_last = self.additions.last().map(Occurrence::start);

        grid_last
            .into_iter()
            .chain(addition_last)
            .fold(self.anchor.start(), Ord::max)
    }
}
