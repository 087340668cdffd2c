//! Event materialization.
//!
//! Turns a series and its detected period into an [`Event`]: grid points
//! with no member become exceptions, members off the grid become additions.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::event::Event;
use crate::occurrence::Occurrence;
use crate::pattern::PatternError;
use crate::period::DetectedPeriod;

/// Build the recurring event for `period` from its series members.
///
/// `members` should include every grid member of the period; any member the
/// period does not contain is recorded as an addition. Duplicates collapse.
pub fn materialize_recurring(
    period: &DetectedPeriod,
    members: impl IntoIterator<Item = Occurrence>,
) -> Result<Event, PatternError> {
    let pattern = period.pattern()?;
    let anchor = period.anchor().clone();

    let (on_grid, additions): (BTreeSet<Occurrence>, BTreeSet<Occurrence>) = members
        .into_iter()
        .filter(|member| *member != anchor)
        .partition(|member| period.contains(member));

    let covered: BTreeSet<NaiveDateTime> = on_grid.iter().map(Occurrence::start).collect();
    let exceptions: BTreeSet<NaiveDateTime> = pattern
        .instants(anchor.start())
        .skip(1)
        .filter(|instant| !covered.contains(instant))
        .collect();

    Ok(Event::from_parts(anchor, Some(pattern), exceptions, additions))
}

/// Build a pattern-less event: `anchor` plus every sibling as an addition.
pub fn materialize_irregular(
    anchor: Occurrence,
    siblings: impl IntoIterator<Item = Occurrence>,
) -> Event {
    let mut event = Event::single(anchor);
    event.extend_additions(siblings);
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{MIN_GRID_MATCHES, detect_period};
    use chrono::TimeDelta;

    fn ts(day: i64, hour: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            + TimeDelta::days(day)
    }

    fn lesson(day: i64, hour: u32, hours: u32) -> Occurrence {
        Occurrence::new(ts(day, hour), ts(day, hour + hours), "Chemistry", None, []).unwrap()
    }

    fn materialize_all(series: &[Occurrence]) -> Event {
        let period = detect_period(series, MIN_GRID_MATCHES).unwrap();
        materialize_recurring(&period, series.iter().cloned()).unwrap()
    }

    #[test]
    fn test_full_grid_has_no_exceptions() {
        let series: Vec<_> = (0..4).map(|w| lesson(w * 7, 9, 1)).collect();
        let event = materialize_all(&series);

        assert_eq!(event.anchor(), &series[0]);
        assert_eq!(event.pattern().unwrap().count(), Some(4));
        assert!(event.exceptions().is_empty());
        assert!(event.additions().is_empty());
        assert_eq!(event.occurrences(), series);
    }

    #[test]
    fn test_missing_week_becomes_exception() {
        let series = vec![lesson(0, 9, 1), lesson(7, 9, 1), lesson(21, 9, 1), lesson(28, 9, 1)];
        let event = materialize_all(&series);

        assert_eq!(event.pattern().unwrap().interval(), TimeDelta::days(7));
        assert_eq!(event.pattern().unwrap().count(), Some(5));
        assert_eq!(event.exceptions(), &BTreeSet::from([ts(14, 9)]));
        assert!(event.additions().is_empty());
        assert_eq!(event.occurrences(), series);
    }

    #[test]
    fn test_off_grid_member_becomes_addition() {
        let makeup = lesson(9, 14, 1);
        let mut series = vec![lesson(0, 9, 1), lesson(7, 9, 1), lesson(14, 9, 1), makeup.clone()];
        series.sort();
        let event = materialize_all(&series);

        assert_eq!(event.pattern().unwrap().count(), Some(3));
        assert!(event.exceptions().is_empty());
        assert_eq!(event.additions(), &BTreeSet::from([makeup]));
        assert_eq!(event.occurrences(), series);
    }

    #[test]
    fn test_double_lesson_on_grid_slot_is_exception_plus_addition() {
        let double = lesson(14, 9, 2);
        let series = vec![lesson(0, 9, 1), lesson(7, 9, 1), double.clone(), lesson(21, 9, 1)];
        let event = materialize_all(&series);

        assert_eq!(event.exceptions(), &BTreeSet::from([ts(14, 9)]));
        assert_eq!(event.additions(), &BTreeSet::from([double]));
        assert_eq!(event.occurrences(), series);
    }

    #[test]
    fn test_duplicate_members_collapse() {
        let series = vec![lesson(0, 9, 1), lesson(7, 9, 1), lesson(7, 9, 1)];
        let event = materialize_all(&series);

        assert!(event.additions().is_empty());
        assert_eq!(event.occurrences(), vec![lesson(0, 9, 1), lesson(7, 9, 1)]);
    }

    #[test]
    fn test_irregular_event_lists_siblings() {
        let first = lesson(0, 9, 1);
        let siblings = vec![lesson(3, 11, 2), lesson(5, 13, 3)];
        let event = materialize_irregular(first.clone(), siblings.clone());

        assert!(event.pattern().is_none());
        assert!(event.exceptions().is_empty());
        assert_eq!(event.additions().len(), 2);

        let mut expected = vec![first];
        expected.extend(siblings);
        assert_eq!(event.occurrences(), expected);
    }
}
