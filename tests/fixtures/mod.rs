//! Shared helpers for integration tests.

use amenity_booking::models::event::Event;
use amenity_booking::models::recurrence::{Frequency, RecurrencePattern};
use amenity_booking::models::resource::{DateRange, Resource};
use amenity_booking::services::database::Database;
use chrono::{NaiveDate, NaiveTime, Weekday};
use tempfile::TempDir;

/// A file-backed database living in a temp directory, so connection
/// handling matches production rather than `:memory:`.
pub struct TestDb {
    pub db: Database,
    pub path: String,
    // dropped last, removing the directory
    _dir: TempDir,
}

pub fn setup_test_db() -> TestDb {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookings.db").to_str().unwrap().to_string();
    let db = Database::new(&path).unwrap();
    db.initialize_schema().unwrap();

    TestDb { db, path, _dir: dir }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn pool() -> Resource {
    Resource::new(1, 10)
}

pub fn gym() -> Resource {
    Resource::new(1, 11)
}

/// Weekly Monday swim slot, 2025-01-06 through 2025-03-31, 14:00-15:00.
pub fn weekly_monday_swim() -> Event {
    Event::recurring(
        "Weekly swim",
        pool(),
        DateRange::new(date(2025, 1, 6), date(2025, 3, 31)).unwrap(),
        RecurrencePattern::new(Frequency::Weekly, vec![Weekday::Mon]),
        time(14, 0),
        time(15, 0),
    )
    .unwrap()
}

pub fn one_time_booking(title: &str, on: NaiveDate, start: NaiveTime, end: NaiveTime) -> Event {
    Event::one_time(title, pool(), on, start, end).unwrap()
}
