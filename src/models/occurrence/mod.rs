// Occurrence module
// A materialized dated instance of a booking, never persisted

use chrono::{NaiveDate, NaiveTime};

use crate::models::event::Event;
use crate::models::exception::OccurrenceOverride;
use crate::models::resource::Resource;
use crate::utils::date::half_open_overlap;

/// One concrete dated instance of a booking after exceptions are applied.
///
/// Occurrences are built on demand for a requested window and owned by the
/// caller; they are never written back to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub event_id: i64,
    pub date: NaiveDate,
    pub resource: Resource,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub title: String,
    pub notes: Option<String>,
    pub cost: Option<f64>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub is_exception: bool,
}

impl Occurrence {
    /// Materialize an occurrence of `event` on `date` with the base
    /// series' fields verbatim.
    pub fn from_event(event: &Event, date: NaiveDate) -> Self {
        Self {
            event_id: event.id.unwrap_or(0),
            date,
            resource: event.resource,
            start_time: event.start_time,
            end_time: event.end_time,
            title: event.title.clone(),
            notes: event.notes.clone(),
            cost: event.cost,
            contact_name: event.contact_name.clone(),
            contact_phone: event.contact_phone.clone(),
            is_exception: false,
        }
    }

    /// Merge overridden fields onto this occurrence and mark it as an
    /// exception.
    pub fn apply_override(&mut self, changes: &OccurrenceOverride) {
        if let Some(ref title) = changes.title {
            self.title = title.clone();
        }
        if let Some(resource) = changes.resource {
            self.resource = resource;
        }
        if let Some(start) = changes.start_time {
            self.start_time = start;
        }
        if let Some(end) = changes.end_time {
            self.end_time = end;
        }
        if let Some(ref notes) = changes.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(cost) = changes.cost {
            self.cost = Some(cost);
        }
        if let Some(ref name) = changes.contact_name {
            self.contact_name = Some(name.clone());
        }
        if let Some(ref phone) = changes.contact_phone {
            self.contact_phone = Some(phone.clone());
        }
        self.is_exception = true;
    }

    /// Half-open overlap test against another time slot: a booking ending
    /// exactly when another starts does not overlap.
    pub fn overlaps_slot(&self, start: NaiveTime, end: NaiveTime) -> bool {
        half_open_overlap(self.start_time, self.end_time, start, end)
    }
}
