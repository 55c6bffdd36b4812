use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Which instance of its weekday the date is within its month
/// (the 14th is always the 2nd instance, whatever the weekday).
pub(super) fn ordinal_in_month(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

/// First instance of `weekday` on or after `date`.
pub(super) fn first_weekday_on_or_after(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = (weekday.num_days_from_monday() as i64
        - date.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    date + Duration::days(offset)
}

/// The `n`-th instance of `weekday` in the given month, or None when the
/// month has fewer than `n` instances. Never rolls over into the next month.
pub(super) fn nth_weekday_in_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    n: u32,
) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let candidate =
        first_weekday_on_or_after(first, weekday) + Duration::days(((n - 1) * 7) as i64);
    (candidate.month() == month).then_some(candidate)
}

/// First day of the month containing `date`.
pub(super) fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Advance a month-start date by `step` whole months.
pub(super) fn advance_months(start: NaiveDate, step: u32) -> NaiveDate {
    let total = start.year() * 12 + start.month0() as i32 + step as i32;
    NaiveDate::from_ymd_opt(total.div_euclid(12), (total.rem_euclid(12) + 1) as u32, 1)
        .unwrap_or(start + Duration::days(31 * step as i64))
}
