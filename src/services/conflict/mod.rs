//! Booking conflict detection.
//! Scans a candidate booking against every existing booking on the same
//! resource, with recurring series expanded over the query window.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime};
use log::debug;

use crate::models::conflict::{ConflictReport, ConflictingOccurrence, DateConflict};
use crate::models::event::{Event, Schedule};
use crate::models::occurrence::Occurrence;
use crate::models::resource::{DateRange, Resource};
use crate::services::expansion::{expand, ExceptionIndex};
use crate::services::recurrence::generate_dates;

/// A proposed booking reduced to what the conflict scan needs: the resource
/// it wants, its wall-clock slot and the concrete dates it would occupy.
#[derive(Debug, Clone)]
pub struct BookingCandidate {
    /// Set during an edit so the booking never collides with itself.
    pub event_id: Option<i64>,
    pub resource: Resource,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub dates: Vec<NaiveDate>,
}

impl BookingCandidate {
    /// Build a candidate from a booking definition, materializing its dates
    /// over the given window.
    pub fn from_event(event: &Event, window: &DateRange) -> Self {
        let dates = match &event.schedule {
            Schedule::OneTime(date) => {
                if window.contains(*date) {
                    vec![*date]
                } else {
                    Vec::new()
                }
            }
            Schedule::Recurring { range, pattern } => generate_dates(pattern, range, window),
        };

        Self {
            event_id: event.id,
            resource: event.resource,
            start_time: event.start_time,
            end_time: event.end_time,
            dates,
        }
    }
}

/// Find every date on which the candidate would overlap an existing booking
/// for the same resource.
///
/// Existing series are expanded through the exception overlay first, so a
/// cancelled occurrence never conflicts and a moved occurrence conflicts at
/// its moved slot. Overlap uses the half-open rule: touching endpoints are
/// not a conflict. Dates with no overlap are omitted from the report.
pub fn find_conflicts(
    candidate: &BookingCandidate,
    existing: &[Event],
    exceptions: &ExceptionIndex,
    window: &DateRange,
) -> ConflictReport {
    // exclude the candidate's own row (edit flow) and other resources
    // before expanding anything
    let relevant = existing.iter().filter(|event| {
        let is_self = matches!(
            (candidate.event_id, event.id),
            (Some(own), Some(other)) if own == other
        );
        !is_self && event.resource == candidate.resource
    });

    let mut by_date: HashMap<NaiveDate, Vec<Occurrence>> = HashMap::new();
    for event in relevant {
        for occurrence in expand(event, exceptions, window) {
            by_date.entry(occurrence.date).or_default().push(occurrence);
        }
    }

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    for &date in &candidate.dates {
        if !seen.insert(date) {
            continue;
        }
        let Some(occurrences) = by_date.get(&date) else {
            continue;
        };

        let mut conflicting: Vec<ConflictingOccurrence> = occurrences
            .iter()
            .filter(|occ| occ.overlaps_slot(candidate.start_time, candidate.end_time))
            .map(ConflictingOccurrence::from)
            .collect();

        if conflicting.is_empty() {
            continue;
        }
        conflicting.sort_by_key(|c| (c.start_time, c.source_event_id));
        entries.push(DateConflict { date, conflicting });
    }

    entries.sort_by_key(|entry| entry.date);
    debug!(
        "conflict scan: {} candidate date(s), {} conflicting",
        candidate.dates.len(),
        entries.len()
    );

    ConflictReport { entries }
}
