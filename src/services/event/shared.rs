use chrono::{DateTime, Local, NaiveDate, NaiveTime, Weekday};
use rusqlite::{self, Result, Row};

use crate::models::event::{Event, Schedule};
use crate::models::exception::{ExceptionRecord, OccurrenceOverride};
use crate::models::recurrence::{Frequency, RecurrencePattern};
use crate::models::resource::{DateRange, Resource};
use crate::utils::date::{parse_date, parse_time};

/// Events joined with their pattern row (NULL pattern columns for one-time
/// bookings). Column order is relied on by `map_event_row`.
pub(super) const EVENT_SELECT: &str = "SELECT e.id, e.title, e.building_id, e.amenity_id,
        e.start_time, e.end_time, e.is_recurring, e.one_time_date,
        e.range_start, e.range_end, e.notes, e.cost, e.contact_name,
        e.contact_phone, e.created_at, e.updated_at,
        p.id, p.frequency, p.weekdays
 FROM events e
 LEFT JOIN recurring_patterns p ON p.event_id = e.id";

pub(super) fn map_event_row(row: &Row<'_>) -> Result<Event> {
    let is_recurring: i32 = row.get(6)?;

    let schedule = if is_recurring != 0 {
        let range_start: Option<String> = row.get(8)?;
        let range_end: Option<String> = row.get(9)?;
        let frequency: Option<String> = row.get(17)?;
        let weekdays_json: Option<String> = row.get(18)?;

        let (Some(range_start), Some(range_end), Some(frequency), Some(weekdays_json)) =
            (range_start, range_end, frequency, weekdays_json)
        else {
            return Err(invalid_row(
                "recurring event row is missing its range or pattern",
            ));
        };

        let frequency = Frequency::from_code(&frequency)
            .ok_or_else(|| invalid_row(format!("unknown frequency code '{}'", frequency)))?;
        let range = DateRange::new(read_date(&range_start)?, read_date(&range_end)?)
            .map_err(invalid_row)?;
        let mut pattern = RecurrencePattern::new(frequency, weekdays_from_json(&weekdays_json)?);
        pattern.id = row.get(16)?;

        Schedule::Recurring { range, pattern }
    } else {
        let date: Option<String> = row.get(7)?;
        let Some(date) = date else {
            return Err(invalid_row("one-time event row is missing its date"));
        };
        Schedule::OneTime(read_date(&date)?)
    };

    Ok(Event {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        resource: Resource::new(row.get(2)?, row.get(3)?),
        start_time: read_time(&row.get::<_, String>(4)?)?,
        end_time: read_time(&row.get::<_, String>(5)?)?,
        schedule,
        notes: row.get(10)?,
        cost: row.get(11)?,
        contact_name: row.get(12)?,
        contact_phone: row.get(13)?,
        created_at: Some(to_local_datetime(row.get::<_, String>(14)?)?),
        updated_at: Some(to_local_datetime(row.get::<_, String>(15)?)?),
    })
}

pub(super) fn map_exception_row(row: &Row<'_>) -> Result<ExceptionRecord> {
    let event_id: i64 = row.get(0)?;
    let date = read_date(&row.get::<_, String>(1)?)?;
    let kind: String = row.get(2)?;

    match kind.as_str() {
        "cancelled" => Ok(ExceptionRecord::Cancelled { event_id, date }),
        "modified" => {
            // a resource override is only meaningful as a full pair
            let building_id: Option<i64> = row.get(4)?;
            let amenity_id: Option<i64> = row.get(5)?;
            let resource = match (building_id, amenity_id) {
                (Some(building), Some(amenity)) => Some(Resource::new(building, amenity)),
                _ => None,
            };

            let start_time = row
                .get::<_, Option<String>>(6)?
                .map(|value| read_time(&value))
                .transpose()?;
            let end_time = row
                .get::<_, Option<String>>(7)?
                .map(|value| read_time(&value))
                .transpose()?;

            Ok(ExceptionRecord::Modified {
                event_id,
                date,
                changes: OccurrenceOverride {
                    title: row.get(3)?,
                    resource,
                    start_time,
                    end_time,
                    notes: row.get(8)?,
                    cost: row.get(9)?,
                    contact_name: row.get(10)?,
                    contact_phone: row.get(11)?,
                },
            })
        }
        other => Err(invalid_row(format!("unknown exception kind '{}'", other))),
    }
}

pub(super) fn weekdays_to_json(weekdays: &[Weekday]) -> String {
    let codes: Vec<&str> = weekdays.iter().map(|day| weekday_code(*day)).collect();
    serde_json::to_string(&codes).unwrap_or_default()
}

pub(super) fn weekdays_from_json(json: &str) -> Result<Vec<Weekday>> {
    let codes: Vec<String> = serde_json::from_str(json)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    codes
        .iter()
        .map(|code| {
            weekday_from_code(code)
                .ok_or_else(|| invalid_row(format!("unknown weekday code '{}'", code)))
        })
        .collect()
}

pub(super) fn to_local_datetime(value: String) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(super) fn read_date(value: &str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| invalid_row(format!("invalid date column '{}'", value)))
}

pub(super) fn read_time(value: &str) -> Result<NaiveTime> {
    parse_time(value).ok_or_else(|| invalid_row(format!("invalid time column '{}'", value)))
}

pub(super) fn invalid_row(message: impl Into<String>) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.into(),
    )))
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "SU",
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
    }
}

fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "SU" => Some(Weekday::Sun),
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        _ => None,
    }
}
