//! Booking creation orchestration.
//! Validates a candidate, scans it for conflicts against a snapshot of the
//! store, then either rejects it, creates it, or creates it while writing
//! cancellation exceptions for the conflicting dates.

use chrono::NaiveDate;
use log::{debug, info, warn};
use thiserror::Error;

use crate::models::conflict::ConflictReport;
use crate::models::event::Event;
use crate::models::exception::ExceptionRecord;
use crate::models::occurrence::Occurrence;
use crate::models::resource::{DateRange, Resource};
use crate::services::conflict::{find_conflicts, BookingCandidate};
use crate::services::event::EventService;
use crate::services::expansion::{expand_for_display, ExceptionIndex};

/// How `create` treats conflicting dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Reject the whole booking if any date conflicts; nothing is written.
    Strict,
    /// Create the series anyway and cancel only the conflicting dates.
    /// Only valid for recurring candidates.
    SkipConflicts,
}

/// A successfully created booking, with the booked/skipped date partition.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedBooking {
    pub event: Event,
    pub booked_dates: Vec<NaiveDate>,
    pub skipped_dates: Vec<NaiveDate>,
}

#[derive(Debug, Error)]
pub enum BookingError {
    /// Malformed candidate; surfaced before any store access.
    #[error("invalid booking: {0}")]
    Validation(String),

    /// Not an engine failure: the normal Strict-mode outcome when the
    /// candidate collides, carrying the full report as data.
    #[error("booking conflicts on {} date(s)", .0.len())]
    Conflicts(ConflictReport),

    /// Programmer error, e.g. skip-conflicts requested for a one-time
    /// booking. Never recoverable at runtime.
    #[error("{0}")]
    Usage(String),

    #[error("failed to read from the booking store")]
    StoreRead(#[source] anyhow::Error),

    /// The event insert itself failed; nothing was created.
    #[error("failed to persist the booking")]
    StoreWrite(#[source] anyhow::Error),

    /// The series was created but some cancellation rows were not. Carries
    /// exactly the dates that did not commit so the caller can retry those
    /// writes alone; re-inserting an already-written cancellation is a
    /// no-op.
    #[error("booking {event_id} created but {} skipped date(s) were not recorded", failed_dates.len())]
    ExceptionWriteFailed {
        event_id: i64,
        failed_dates: Vec<NaiveDate>,
        #[source]
        source: anyhow::Error,
    },
}

/// The store operations booking creation depends on. `EventService` is the
/// SQLite-backed implementation; tests substitute a mock to exercise
/// partial-write failures.
#[cfg_attr(test, mockall::automock)]
pub trait BookingStore {
    fn find_by_resource(&self, resource: Resource, window: &DateRange)
        -> anyhow::Result<Vec<Event>>;
    fn list_exceptions(
        &self,
        series_ids: &[i64],
        window: &DateRange,
    ) -> anyhow::Result<Vec<ExceptionRecord>>;
    fn insert_event(&self, event: Event) -> anyhow::Result<Event>;
    fn cancel_occurrence(&self, event_id: i64, date: NaiveDate) -> anyhow::Result<()>;
}

impl BookingStore for EventService<'_> {
    fn find_by_resource(
        &self,
        resource: Resource,
        window: &DateRange,
    ) -> anyhow::Result<Vec<Event>> {
        EventService::find_by_resource(self, resource, window)
    }

    fn list_exceptions(
        &self,
        series_ids: &[i64],
        window: &DateRange,
    ) -> anyhow::Result<Vec<ExceptionRecord>> {
        EventService::list_exceptions(self, series_ids, window)
    }

    fn insert_event(&self, event: Event) -> anyhow::Result<Event> {
        EventService::create(self, event)
    }

    fn cancel_occurrence(&self, event_id: i64, date: NaiveDate) -> anyhow::Result<()> {
        EventService::cancel_occurrence(self, event_id, date)
    }
}

/// Orchestrates validation, conflict detection and store writes for new
/// bookings.
pub struct BookingCreator<S: BookingStore> {
    store: S,
}

impl<S: BookingStore> BookingCreator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Scan a candidate booking for conflicts without writing anything.
    /// Used by callers for the pre-submit check and run again by `create`
    /// before committing.
    pub fn detect_conflicts(
        &self,
        candidate: &Event,
        window: &DateRange,
    ) -> Result<ConflictReport, BookingError> {
        candidate.validate().map_err(BookingError::Validation)?;

        let (existing, exceptions) = self.load_snapshot(candidate.resource, window)?;
        let booking = BookingCandidate::from_event(candidate, window);
        Ok(find_conflicts(&booking, &existing, &exceptions, window))
    }

    /// Validate and create a booking.
    ///
    /// With no conflicts the event is persisted and every generated date is
    /// booked. With conflicts, `Strict` rejects and creates nothing, while
    /// `SkipConflicts` persists the series and writes a cancellation
    /// exception for each conflicting date against the new series id.
    pub fn create(&self, event: Event, mode: CreateMode) -> Result<CreatedBooking, BookingError> {
        if mode == CreateMode::SkipConflicts && !event.is_recurring() {
            return Err(BookingError::Usage(
                "skip-conflicts mode only applies to recurring bookings".to_string(),
            ));
        }

        event.validate().map_err(BookingError::Validation)?;

        let window = event.span();
        let (existing, exceptions) = self.load_snapshot(event.resource, &window)?;
        let candidate = BookingCandidate::from_event(&event, &window);
        let report = find_conflicts(&candidate, &existing, &exceptions, &window);

        if report.is_empty() {
            let created = self
                .store
                .insert_event(event)
                .map_err(BookingError::StoreWrite)?;
            info!(
                "created booking {:?} with {} date(s)",
                created.id,
                candidate.dates.len()
            );
            return Ok(CreatedBooking {
                event: created,
                booked_dates: candidate.dates,
                skipped_dates: Vec::new(),
            });
        }

        match mode {
            CreateMode::Strict => {
                debug!("rejecting booking: {} conflicting date(s)", report.len());
                Err(BookingError::Conflicts(report))
            }
            CreateMode::SkipConflicts => {
                let skipped = report.dates();
                let created = self
                    .store
                    .insert_event(event)
                    .map_err(BookingError::StoreWrite)?;
                let Some(event_id) = created.id else {
                    return Err(BookingError::StoreWrite(anyhow::anyhow!(
                        "store did not assign an id to the created booking"
                    )));
                };

                let mut failed_dates = Vec::new();
                let mut last_error = None;
                for &date in &skipped {
                    if let Err(error) = self.store.cancel_occurrence(event_id, date) {
                        failed_dates.push(date);
                        last_error = Some(error);
                    }
                }

                if let Some(source) = last_error {
                    warn!(
                        "booking {} created but {} cancellation row(s) failed",
                        event_id,
                        failed_dates.len()
                    );
                    return Err(BookingError::ExceptionWriteFailed {
                        event_id,
                        failed_dates,
                        source,
                    });
                }

                let booked_dates: Vec<NaiveDate> = candidate
                    .dates
                    .iter()
                    .copied()
                    .filter(|date| !skipped.contains(date))
                    .collect();
                info!(
                    "created booking {} with {} date(s), skipped {}",
                    event_id,
                    booked_dates.len(),
                    skipped.len()
                );

                Ok(CreatedBooking {
                    event: created,
                    booked_dates,
                    skipped_dates: skipped,
                })
            }
        }
    }

    /// Materialized occurrences for a resource over a window, for calendar
    /// and list views.
    pub fn occurrences(
        &self,
        resource: Resource,
        window: &DateRange,
    ) -> Result<Vec<Occurrence>, BookingError> {
        let (existing, exceptions) = self.load_snapshot(resource, window)?;
        Ok(expand_for_display(&existing, &exceptions, window))
    }

    /// One read of events plus exceptions for the window; the snapshot is
    /// handed to the pure engine and discarded with the request.
    fn load_snapshot(
        &self,
        resource: Resource,
        window: &DateRange,
    ) -> Result<(Vec<Event>, ExceptionIndex), BookingError> {
        let existing = self
            .store
            .find_by_resource(resource, window)
            .map_err(BookingError::StoreRead)?;

        let series_ids: Vec<i64> = existing
            .iter()
            .filter(|event| event.is_recurring())
            .filter_map(|event| event.id)
            .collect();
        let records = self
            .store
            .list_exceptions(&series_ids, window)
            .map_err(BookingError::StoreRead)?;

        Ok((existing, ExceptionIndex::from_records(records)))
    }
}
