use chrono::{Duration, NaiveDate};

use crate::models::recurrence::RecurrencePattern;
use crate::models::resource::DateRange;

use super::utils::first_weekday_on_or_after;

/// Weekly (7-day step) and biweekly (14-day step) generation.
///
/// For each weekday the series fires on, the walk starts at that weekday's
/// first instance on/after the series start date and advances by whole
/// steps. Anchoring at the series start keeps the biweekly phase stable no
/// matter where the query window sits.
pub(super) fn generate(
    pattern: &RecurrencePattern,
    series_start: NaiveDate,
    range: &DateRange,
    step_days: i64,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();

    for weekday in pattern.effective_weekdays(series_start) {
        let mut current = first_weekday_on_or_after(series_start, weekday);

        // fast-forward to the range in whole steps to preserve the phase
        if current < range.start {
            let gap = (range.start - current).num_days();
            let steps = (gap + step_days - 1) / step_days;
            current += Duration::days(steps * step_days);
        }

        while current <= range.end {
            dates.push(current);
            current += Duration::days(step_days);
        }
    }

    dates
}
