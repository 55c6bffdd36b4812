use super::shared::{map_event_row, map_exception_row, EVENT_SELECT};
use super::EventService;
use crate::models::event::Event;
use crate::models::exception::ExceptionRecord;
use crate::models::recurrence::{Frequency, RecurrencePattern};
use crate::models::resource::{DateRange, Resource};
use crate::utils::date::format_date;
use anyhow::Result;
use rusqlite::{self, params, types::ToSql};

impl<'a> EventService<'a> {
    /// List every booking ordered by id.
    pub fn list_all(&self) -> Result<Vec<Event>> {
        let sql = format!("{} ORDER BY e.id ASC", EVENT_SELECT);
        let mut stmt = self.conn.prepare(&sql)?;

        let events = stmt
            .query_map([], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Bookings that can touch the window for a resource: one-time rows
    /// dated inside it plus every recurring series whose range intersects
    /// it, unfiltered by exceptions.
    pub fn find_by_resource(&self, resource: Resource, window: &DateRange) -> Result<Vec<Event>> {
        let sql = format!(
            "{} WHERE e.building_id = ? AND e.amenity_id = ?
               AND ((e.is_recurring = 0 AND e.one_time_date BETWEEN ? AND ?)
                 OR (e.is_recurring = 1 AND e.range_start <= ? AND e.range_end >= ?))
             ORDER BY e.id ASC",
            EVENT_SELECT
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let events = stmt
            .query_map(
                params![
                    resource.building_id,
                    resource.amenity_id,
                    format_date(window.start),
                    format_date(window.end),
                    format_date(window.end),
                    format_date(window.start),
                ],
                map_event_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(events)
    }

    /// Exception rows for the given series inside the window.
    pub fn list_exceptions(
        &self,
        series_ids: &[i64],
        window: &DateRange,
    ) -> Result<Vec<ExceptionRecord>> {
        if series_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; series_ids.len()].join(", ");
        let sql = format!(
            "SELECT event_id, occurrence_date, kind, title, building_id, amenity_id,
                    start_time, end_time, notes, cost, contact_name, contact_phone
             FROM event_exceptions
             WHERE occurrence_date BETWEEN ? AND ? AND event_id IN ({})
             ORDER BY event_id, occurrence_date, kind",
            placeholders
        );

        let start = format_date(window.start);
        let end = format_date(window.end);
        let mut query_params: Vec<&dyn ToSql> = vec![&start, &end];
        for id in series_ids {
            query_params.push(id);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(query_params.as_slice(), map_exception_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// The recurrence pattern row for a series, if one exists.
    pub fn get_pattern(&self, event_id: i64) -> Result<Option<RecurrencePattern>> {
        let result = self.conn.query_row(
            "SELECT id, frequency, weekdays FROM recurring_patterns WHERE event_id = ?",
            [event_id],
            |row| {
                let frequency: String = row.get(1)?;
                let frequency = Frequency::from_code(&frequency).ok_or_else(|| {
                    super::shared::invalid_row(format!("unknown frequency code '{}'", frequency))
                })?;
                let weekdays =
                    super::shared::weekdays_from_json(&row.get::<_, String>(2)?)?;
                let mut pattern = RecurrencePattern::new(frequency, weekdays);
                pattern.id = Some(row.get(0)?);
                Ok(pattern)
            },
        );

        match result {
            Ok(pattern) => Ok(Some(pattern)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
