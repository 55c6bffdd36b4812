// Conflict module
// Report types describing where a candidate booking collides

use chrono::{NaiveDate, NaiveTime};

use crate::models::occurrence::Occurrence;

/// One existing occurrence the candidate collides with.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictingOccurrence {
    pub source_event_id: i64,
    pub title: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<&Occurrence> for ConflictingOccurrence {
    fn from(occ: &Occurrence) -> Self {
        Self {
            source_event_id: occ.event_id,
            title: occ.title.clone(),
            start_time: occ.start_time,
            end_time: occ.end_time,
        }
    }
}

/// All collisions on a single date. Only dates with at least one
/// overlapping occurrence appear in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct DateConflict {
    pub date: NaiveDate,
    pub conflicting: Vec<ConflictingOccurrence>,
}

/// The outcome of a conflict scan, one entry per conflicting date,
/// ordered by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictReport {
    pub entries: Vec<DateConflict>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The conflicting dates, in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.entries.iter().map(|entry| entry.date).collect()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.entries.iter().any(|entry| entry.date == date)
    }
}
