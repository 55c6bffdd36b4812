use super::shared::{weekdays_to_json, EVENT_SELECT};
use super::EventService;
use crate::models::event::{Event, Schedule};
use crate::models::exception::OccurrenceOverride;
use crate::models::resource::DateRange;
use crate::utils::date::{format_date, format_time};
use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{self, params};

impl<'a> EventService<'a> {
    /// Create a new booking in the store, inserting the pattern row when
    /// the booking is a recurring series.
    pub fn create(&self, mut event: Event) -> Result<Event> {
        event.validate().map_err(|e| anyhow!(e))?;

        let now = Local::now().to_rfc3339();
        let (is_recurring, one_time_date, range_start, range_end) = schedule_columns(&event);

        self.conn
            .execute(
                "INSERT INTO events (
                    title, building_id, amenity_id, start_time, end_time,
                    is_recurring, one_time_date, range_start, range_end,
                    notes, cost, contact_name, contact_phone,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    event.title,
                    event.resource.building_id,
                    event.resource.amenity_id,
                    format_time(event.start_time),
                    format_time(event.end_time),
                    is_recurring as i32,
                    one_time_date,
                    range_start,
                    range_end,
                    event.notes,
                    event.cost,
                    event.contact_name,
                    event.contact_phone,
                    &now,
                    &now,
                ],
            )
            .context("Failed to insert event")?;

        let id = self.conn.last_insert_rowid();
        event.id = Some(id);

        if let Schedule::Recurring { pattern, .. } = &mut event.schedule {
            self.conn
                .execute(
                    "INSERT INTO recurring_patterns (event_id, frequency, weekdays)
                     VALUES (?, ?, ?)",
                    params![
                        id,
                        pattern.frequency.as_code(),
                        weekdays_to_json(&pattern.weekdays)
                    ],
                )
                .context("Failed to insert recurrence pattern")?;
            pattern.id = Some(self.conn.last_insert_rowid());
        }

        event.created_at = Some(Local::now());
        event.updated_at = Some(Local::now());

        Ok(event)
    }

    /// Retrieve a booking by ID.
    pub fn get(&self, id: i64) -> Result<Option<Event>> {
        let sql = format!("{} WHERE e.id = ?", EVENT_SELECT);
        let result = self
            .conn
            .query_row(&sql, [id], super::shared::map_event_row);

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update an existing booking, keeping the pattern row in step.
    pub fn update(&self, event: &Event) -> Result<()> {
        let id = event
            .id
            .ok_or_else(|| anyhow!("Event ID is required for update"))?;
        event.validate().map_err(|e| anyhow!(e))?;

        let (is_recurring, one_time_date, range_start, range_end) = schedule_columns(event);

        let rows_affected = self
            .conn
            .execute(
                "UPDATE events SET
                    title = ?, building_id = ?, amenity_id = ?,
                    start_time = ?, end_time = ?,
                    is_recurring = ?, one_time_date = ?, range_start = ?, range_end = ?,
                    notes = ?, cost = ?, contact_name = ?, contact_phone = ?,
                    updated_at = ?
                 WHERE id = ?",
                params![
                    event.title,
                    event.resource.building_id,
                    event.resource.amenity_id,
                    format_time(event.start_time),
                    format_time(event.end_time),
                    is_recurring as i32,
                    one_time_date,
                    range_start,
                    range_end,
                    event.notes,
                    event.cost,
                    event.contact_name,
                    event.contact_phone,
                    Local::now().to_rfc3339(),
                    id,
                ],
            )
            .context("Failed to update event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        match &event.schedule {
            Schedule::Recurring { pattern, .. } => {
                self.conn
                    .execute(
                        "INSERT INTO recurring_patterns (event_id, frequency, weekdays)
                         VALUES (?, ?, ?)
                         ON CONFLICT(event_id) DO UPDATE SET
                            frequency = excluded.frequency,
                            weekdays = excluded.weekdays",
                        params![
                            id,
                            pattern.frequency.as_code(),
                            weekdays_to_json(&pattern.weekdays)
                        ],
                    )
                    .context("Failed to upsert recurrence pattern")?;
            }
            Schedule::OneTime(_) => {
                self.conn
                    .execute("DELETE FROM recurring_patterns WHERE event_id = ?", [id])
                    .context("Failed to remove stale recurrence pattern")?;
            }
        }

        Ok(())
    }

    /// Delete a booking by ID. Pattern and exception rows go with it via
    /// foreign key cascade.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM events WHERE id = ?", [id])
            .context("Failed to delete event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        Ok(())
    }

    /// Cancel a single occurrence of a recurring series.
    ///
    /// Idempotent: re-cancelling an already-cancelled date is a no-op, so a
    /// caller-level retry of a partially failed skip-conflicts write can
    /// safely re-run.
    pub fn cancel_occurrence(&self, event_id: i64, date: NaiveDate) -> Result<()> {
        self.require_recurring(event_id)?;

        self.conn
            .execute(
                "INSERT OR IGNORE INTO event_exceptions
                    (event_id, occurrence_date, kind, created_at)
                 VALUES (?, ?, 'cancelled', ?)",
                params![event_id, format_date(date), Local::now().to_rfc3339()],
            )
            .context("Failed to insert cancellation")?;

        Ok(())
    }

    /// Record a modified occurrence of a recurring series, replacing any
    /// previous modification for the same date.
    pub fn override_occurrence(
        &self,
        event_id: i64,
        date: NaiveDate,
        changes: &OccurrenceOverride,
    ) -> Result<()> {
        changes.validate().map_err(|e| anyhow!(e))?;
        self.require_recurring(event_id)?;

        self.conn
            .execute(
                "INSERT OR REPLACE INTO event_exceptions
                    (event_id, occurrence_date, kind, title, building_id, amenity_id,
                     start_time, end_time, notes, cost, contact_name, contact_phone,
                     created_at)
                 VALUES (?, ?, 'modified', ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    event_id,
                    format_date(date),
                    changes.title,
                    changes.resource.map(|r| r.building_id),
                    changes.resource.map(|r| r.amenity_id),
                    changes.start_time.map(format_time),
                    changes.end_time.map(format_time),
                    changes.notes,
                    changes.cost,
                    changes.contact_name,
                    changes.contact_phone,
                    Local::now().to_rfc3339(),
                ],
            )
            .context("Failed to upsert occurrence override")?;

        Ok(())
    }

    /// Remove every exception for `(event_id, date)`, restoring the base
    /// occurrence. Removing a missing exception is a no-op.
    pub fn restore_occurrence(&self, event_id: i64, date: NaiveDate) -> Result<()> {
        self.conn
            .execute(
                "DELETE FROM event_exceptions WHERE event_id = ? AND occurrence_date = ?",
                params![event_id, format_date(date)],
            )
            .context("Failed to delete exception rows")?;

        Ok(())
    }

    fn require_recurring(&self, event_id: i64) -> Result<Event> {
        let event = self
            .get(event_id)?
            .ok_or_else(|| anyhow!("Event with id {} not found", event_id))?;

        if !event.is_recurring() {
            return Err(anyhow!(
                "Event {} is not recurring; exceptions only apply to series",
                event_id
            ));
        }

        Ok(event)
    }
}

fn schedule_columns(event: &Event) -> (bool, Option<String>, Option<String>, Option<String>) {
    match &event.schedule {
        Schedule::OneTime(date) => (false, Some(format_date(*date)), None, None),
        Schedule::Recurring {
            range: DateRange { start, end },
            ..
        } => (
            true,
            None,
            Some(format_date(*start)),
            Some(format_date(*end)),
        ),
    }
}
