use chrono::{Datelike, Duration, NaiveDate};

use crate::models::recurrence::RecurrencePattern;
use crate::models::resource::DateRange;

/// Every date in the clamped range; a non-empty weekday list restricts the
/// series to those weekdays.
pub(super) fn generate(pattern: &RecurrencePattern, range: &DateRange) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let restricted = !pattern.weekdays.is_empty();

    let mut current = range.start;
    while current <= range.end {
        if !restricted || pattern.weekdays.contains(&current.weekday()) {
            dates.push(current);
        }
        current += Duration::days(1);
    }

    dates
}
