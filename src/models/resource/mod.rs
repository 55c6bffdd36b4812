// Resource module
// Identifies the (building, amenity) pair a booking occupies

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The (building, amenity) pair a booking occupies.
///
/// Conflicts are scoped to identical resources: two bookings can only
/// collide when both the building and the amenity match. Different
/// amenities inside the same building never conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub building_id: i64,
    pub amenity_id: i64,
}

impl Resource {
    pub fn new(building_id: i64, amenity_id: i64) -> Self {
        Self {
            building_id,
            amenity_id,
        }
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new range, rejecting an end date before the start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err("Range end date must not be before start date".to_string());
        }
        Ok(Self { start, end })
    }

    /// A range covering a single date.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Intersection of two ranges, or None when they do not overlap.
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(DateRange { start, end })
        } else {
            None
        }
    }
}
