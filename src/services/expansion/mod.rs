//! Exception overlay and recurrence expansion.
//! Materializes the final bookable occurrences of an event inside a window,
//! with cancelled dates dropped and modified dates merged in.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::event::{Event, Schedule};
use crate::models::exception::{ExceptionRecord, OccurrenceOverride};
use crate::models::occurrence::Occurrence;
use crate::models::resource::DateRange;
use crate::services::recurrence::generate_dates;

/// Request-scoped index of exception records keyed by `(event_id, date)`.
///
/// Built from a snapshot of the store's exception rows for the window being
/// expanded; rebuilt per request rather than shared, since exception data
/// changes between requests. At most one record survives per key and a
/// cancellation always displaces a modification.
#[derive(Debug, Default)]
pub struct ExceptionIndex {
    entries: HashMap<(i64, NaiveDate), ExceptionRecord>,
}

impl ExceptionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ExceptionRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(record);
        }
        index
    }

    pub fn insert(&mut self, record: ExceptionRecord) {
        match self.entries.entry(record.key()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                // cancellation wins over any modification for the same key
                if record.is_cancellation() || !slot.get().is_cancellation() {
                    slot.insert(record);
                }
            }
        }
    }

    pub fn is_cancelled(&self, event_id: i64, date: NaiveDate) -> bool {
        self.entries
            .get(&(event_id, date))
            .is_some_and(|record| record.is_cancellation())
    }

    pub fn modification(&self, event_id: i64, date: NaiveDate) -> Option<&OccurrenceOverride> {
        match self.entries.get(&(event_id, date)) {
            Some(ExceptionRecord::Modified { changes, .. }) => Some(changes),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Materialize the bookable occurrences of one event inside a window.
///
/// A one-time booking yields zero or one occurrence. A recurring series is
/// generated over the window, then each candidate date is checked against
/// the exception index: cancelled dates are dropped, modified dates keep
/// their slot with overridden fields merged in. Output is sorted ascending
/// by `(date, start_time)`. Pure read over immutable inputs.
pub fn expand(event: &Event, exceptions: &ExceptionIndex, window: &DateRange) -> Vec<Occurrence> {
    let mut occurrences = match &event.schedule {
        Schedule::OneTime(date) => {
            if window.contains(*date) {
                vec![Occurrence::from_event(event, *date)]
            } else {
                Vec::new()
            }
        }
        Schedule::Recurring { range, pattern } => {
            let event_id = event.id.unwrap_or(0);
            let mut occurrences = Vec::new();
            for date in generate_dates(pattern, range, window) {
                if exceptions.is_cancelled(event_id, date) {
                    continue;
                }
                let mut occurrence = Occurrence::from_event(event, date);
                if let Some(changes) = exceptions.modification(event_id, date) {
                    occurrence.apply_override(changes);
                }
                occurrences.push(occurrence);
            }
            occurrences
        }
    };

    occurrences.sort_by_key(|occ| (occ.date, occ.start_time));
    occurrences
}

/// Expand many events at once for a calendar/list view, sorted ascending by
/// `(date, start_time, event_id)`.
pub fn expand_for_display(
    events: &[Event],
    exceptions: &ExceptionIndex,
    window: &DateRange,
) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = events
        .iter()
        .flat_map(|event| expand(event, exceptions, window))
        .collect();

    occurrences.sort_by_key(|occ| (occ.date, occ.start_time, occ.event_id));
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recurrence::{Frequency, RecurrencePattern};
    use crate::models::resource::Resource;
    use chrono::{NaiveTime, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday_series() -> Event {
        let mut event = Event::recurring(
            "Weekly swim",
            Resource::new(1, 10),
            DateRange::new(date(2025, 1, 6), date(2025, 3, 31)).unwrap(),
            RecurrencePattern::new(Frequency::Weekly, vec![Weekday::Mon]),
            time(14, 0),
            time(15, 0),
        )
        .unwrap();
        event.id = Some(42);
        event
    }

    fn february() -> DateRange {
        DateRange::new(date(2025, 2, 1), date(2025, 2, 28)).unwrap()
    }

    #[test]
    fn test_one_time_inside_window() {
        let event = Event::one_time(
            "Party",
            Resource::new(1, 10),
            date(2025, 2, 10),
            time(10, 0),
            time(12, 0),
        )
        .unwrap();

        let occurrences = expand(&event, &ExceptionIndex::new(), &february());
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].date, date(2025, 2, 10));
        assert!(!occurrences[0].is_exception);
    }

    #[test]
    fn test_one_time_outside_window() {
        let event = Event::one_time(
            "Party",
            Resource::new(1, 10),
            date(2025, 3, 10),
            time(10, 0),
            time(12, 0),
        )
        .unwrap();

        assert!(expand(&event, &ExceptionIndex::new(), &february()).is_empty());
    }

    #[test]
    fn test_series_expands_without_exceptions() {
        let occurrences = expand(&monday_series(), &ExceptionIndex::new(), &february());
        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2025, 2, 3),
                date(2025, 2, 10),
                date(2025, 2, 17),
                date(2025, 2, 24),
            ]
        );
        assert!(occurrences.iter().all(|o| o.start_time == time(14, 0)));
    }

    #[test]
    fn test_cancelled_date_dropped() {
        let index = ExceptionIndex::from_records(vec![ExceptionRecord::Cancelled {
            event_id: 42,
            date: date(2025, 2, 10),
        }]);

        let occurrences = expand(&monday_series(), &index, &february());
        let dates: Vec<NaiveDate> = occurrences.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![date(2025, 2, 3), date(2025, 2, 17), date(2025, 2, 24)]
        );
    }

    #[test]
    fn test_modified_date_merges_fields() {
        let index = ExceptionIndex::from_records(vec![ExceptionRecord::Modified {
            event_id: 42,
            date: date(2025, 2, 17),
            changes: OccurrenceOverride {
                start_time: Some(time(16, 0)),
                end_time: Some(time(17, 0)),
                title: Some("Swim (moved)".to_string()),
                ..Default::default()
            },
        }]);

        let occurrences = expand(&monday_series(), &index, &february());
        let moved = occurrences
            .iter()
            .find(|o| o.date == date(2025, 2, 17))
            .unwrap();
        assert_eq!(moved.start_time, time(16, 0));
        assert_eq!(moved.title, "Swim (moved)");
        assert!(moved.is_exception);

        let untouched = occurrences
            .iter()
            .find(|o| o.date == date(2025, 2, 10))
            .unwrap();
        assert_eq!(untouched.start_time, time(14, 0));
        assert!(!untouched.is_exception);
    }

    #[test]
    fn test_cancellation_beats_modification() {
        // both records exist for the same key, in either insertion order
        for records in [
            vec![
                ExceptionRecord::Cancelled {
                    event_id: 42,
                    date: date(2025, 2, 10),
                },
                ExceptionRecord::Modified {
                    event_id: 42,
                    date: date(2025, 2, 10),
                    changes: OccurrenceOverride {
                        cost: Some(1.0),
                        ..Default::default()
                    },
                },
            ],
            vec![
                ExceptionRecord::Modified {
                    event_id: 42,
                    date: date(2025, 2, 10),
                    changes: OccurrenceOverride {
                        cost: Some(1.0),
                        ..Default::default()
                    },
                },
                ExceptionRecord::Cancelled {
                    event_id: 42,
                    date: date(2025, 2, 10),
                },
            ],
        ] {
            let index = ExceptionIndex::from_records(records);
            assert!(index.is_cancelled(42, date(2025, 2, 10)));
            assert!(index.modification(42, date(2025, 2, 10)).is_none());

            let occurrences = expand(&monday_series(), &index, &february());
            assert!(occurrences.iter().all(|o| o.date != date(2025, 2, 10)));
        }
    }

    #[test]
    fn test_exceptions_scoped_to_their_series() {
        let index = ExceptionIndex::from_records(vec![ExceptionRecord::Cancelled {
            event_id: 99,
            date: date(2025, 2, 10),
        }]);

        let occurrences = expand(&monday_series(), &index, &february());
        assert!(occurrences.iter().any(|o| o.date == date(2025, 2, 10)));
    }

    #[test]
    fn test_expand_is_deterministic() {
        let index = ExceptionIndex::from_records(vec![ExceptionRecord::Cancelled {
            event_id: 42,
            date: date(2025, 2, 10),
        }]);
        let event = monday_series();

        let first = expand(&event, &index, &february());
        let second = expand(&event, &index, &february());
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_sorted_across_events() {
        let series = monday_series();
        let mut one_time = Event::one_time(
            "Morning yoga",
            Resource::new(1, 10),
            date(2025, 2, 10),
            time(8, 0),
            time(9, 0),
        )
        .unwrap();
        one_time.id = Some(7);

        let occurrences =
            expand_for_display(&[series, one_time], &ExceptionIndex::new(), &february());

        // Feb 10 has two occurrences: yoga at 08:00 before swim at 14:00
        let feb10: Vec<&Occurrence> = occurrences
            .iter()
            .filter(|o| o.date == date(2025, 2, 10))
            .collect();
        assert_eq!(feb10.len(), 2);
        assert_eq!(feb10[0].title, "Morning yoga");
        assert_eq!(feb10[1].title, "Weekly swim");

        for pair in occurrences.windows(2) {
            assert!((pair[0].date, pair[0].start_time) <= (pair[1].date, pair[1].start_time));
        }
    }
}
