use chrono::{Datelike, NaiveDate};

use crate::models::recurrence::RecurrencePattern;
use crate::models::resource::DateRange;

use super::utils::{advance_months, month_start, nth_weekday_in_month, ordinal_in_month};

/// Monthly (1-month step) and quarterly (3-month step) generation using the
/// nth-weekday-of-month rule.
///
/// The ordinal is derived once from the series' own start date ("2nd
/// Tuesday" when the series starts on the second Tuesday of its month).
/// Months are stepped from the series-start month so the quarterly phase is
/// anchored to the quarter containing the series start. A month without an
/// nth instance of the weekday contributes no date.
pub(super) fn generate(
    pattern: &RecurrencePattern,
    series_start: NaiveDate,
    range: &DateRange,
    month_step: u32,
) -> Vec<NaiveDate> {
    let ordinal = ordinal_in_month(series_start);
    let weekdays = pattern.effective_weekdays(series_start);
    let mut dates = Vec::new();

    let mut cursor = month_start(series_start);
    while cursor <= range.end {
        if cursor >= month_start(range.start) {
            for &weekday in &weekdays {
                if let Some(date) =
                    nth_weekday_in_month(cursor.year(), cursor.month(), weekday, ordinal)
                {
                    if range.contains(date) {
                        dates.push(date);
                    }
                }
            }
        }
        cursor = advance_months(cursor, month_step);
    }

    dates
}
