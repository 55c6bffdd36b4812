// Exception module
// Per-date overrides attached to a recurring series

use chrono::{NaiveDate, NaiveTime};

use crate::models::resource::Resource;

/// Field overrides for a single occurrence of a series.
///
/// Every `Some` field replaces the base series' value for that occurrence
/// only; `None` fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceOverride {
    pub title: Option<String>,
    pub resource: Option<Resource>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub cost: Option<f64>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
}

impl OccurrenceOverride {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.resource.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.notes.is_none()
            && self.cost.is_none()
            && self.contact_name.is_none()
            && self.contact_phone.is_none()
    }

    /// Validate the override.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("Occurrence override must change at least one field".to_string());
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err("Override end time must be after start time".to_string());
            }
        }
        Ok(())
    }
}

/// A per-date exception attached to a recurring series, keyed by
/// `(event_id, date)`.
///
/// The two kinds are a tagged union so the "cancellation wins" precedence
/// rule is structural rather than an ordering convention: an index slot
/// holds exactly one record and `Cancelled` displaces `Modified`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExceptionRecord {
    /// The date is removed from the series' materialized occurrences.
    Cancelled { event_id: i64, date: NaiveDate },
    /// The date keeps its slot with the overridden fields applied.
    Modified {
        event_id: i64,
        date: NaiveDate,
        changes: OccurrenceOverride,
    },
}

impl ExceptionRecord {
    pub fn event_id(&self) -> i64 {
        match self {
            ExceptionRecord::Cancelled { event_id, .. } => *event_id,
            ExceptionRecord::Modified { event_id, .. } => *event_id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            ExceptionRecord::Cancelled { date, .. } => *date,
            ExceptionRecord::Modified { date, .. } => *date,
        }
    }

    pub fn key(&self) -> (i64, NaiveDate) {
        (self.event_id(), self.date())
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, ExceptionRecord::Cancelled { .. })
    }
}
