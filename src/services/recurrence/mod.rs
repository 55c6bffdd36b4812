//! Occurrence date generation for recurring bookings.
//! Turns a recurrence pattern plus a query window into the ordered list of
//! candidate dates, before any exception overlay is applied.

use chrono::NaiveDate;

use crate::models::recurrence::{Frequency, RecurrencePattern};
use crate::models::resource::DateRange;

mod daily;
mod monthly;
mod utils;
mod weekly;

/// Generate the candidate occurrence dates of a series inside a window.
///
/// The result is restricted to the intersection of the series range and the
/// window, sorted ascending and deduplicated. Purely a function of its
/// inputs: identical arguments always produce identical output.
pub fn generate_dates(
    pattern: &RecurrencePattern,
    series: &DateRange,
    window: &DateRange,
) -> Vec<NaiveDate> {
    let Some(range) = series.intersect(window) else {
        return Vec::new();
    };

    let mut dates = match pattern.frequency {
        Frequency::Daily => daily::generate(pattern, &range),
        // Weekly and BiWeekly share the walk; the cadence is anchored at the
        // series start so the phase never shifts with the query window
        Frequency::Weekly => weekly::generate(pattern, series.start, &range, 7),
        Frequency::BiWeekly => weekly::generate(pattern, series.start, &range, 14),
        Frequency::Monthly => monthly::generate(pattern, series.start, &range, 1),
        Frequency::Quarterly => monthly::generate(pattern, series.start, &range, 3),
    };

    dates.sort_unstable();
    dates.dedup();
    dates
}
