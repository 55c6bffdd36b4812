// Event module
// One-time and recurring booking definitions

use chrono::{DateTime, Local, NaiveDate, NaiveTime};

use crate::models::recurrence::RecurrencePattern;
use crate::models::resource::{DateRange, Resource};

/// When a booking occupies its resource.
///
/// The "recurring implies range and pattern are present" invariant is
/// carried by the type: a one-time booking has only its date, a recurring
/// one always has both a range and a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    OneTime(NaiveDate),
    Recurring {
        range: DateRange,
        pattern: RecurrencePattern,
    },
}

/// A booking definition: either a single dated booking or a recurring
/// series. Start and end are wall-clock times shared by every occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Option<i64>,
    pub title: String,
    pub resource: Resource,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub schedule: Schedule,
    pub notes: Option<String>,
    pub cost: Option<f64>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: Option<DateTime<Local>>,
    pub updated_at: Option<DateTime<Local>>,
}

impl Event {
    /// Create a one-time booking with required fields.
    ///
    /// # Arguments
    /// * `title` - Booking title (required, non-empty)
    /// * `resource` - Building/amenity pair the booking occupies
    /// * `date` - The single date of the booking
    /// * `start_time` / `end_time` - Wall-clock slot on that date
    pub fn one_time(
        title: impl Into<String>,
        resource: Resource,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, String> {
        Event::builder()
            .title(title)
            .resource(resource)
            .times(start_time, end_time)
            .on(date)
            .build()
    }

    /// Create a recurring booking series with required fields.
    pub fn recurring(
        title: impl Into<String>,
        resource: Resource,
        range: DateRange,
        pattern: RecurrencePattern,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, String> {
        Event::builder()
            .title(title)
            .resource(resource)
            .times(start_time, end_time)
            .repeating(range, pattern)
            .build()
    }

    /// Create a builder for constructing bookings with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the booking definition.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Booking title cannot be empty".to_string());
        }

        if self.end_time <= self.start_time {
            return Err("Booking end time must be after start time".to_string());
        }

        if let Some(cost) = self.cost {
            if cost < 0.0 {
                return Err("Booking cost cannot be negative".to_string());
            }
        }

        if let Schedule::Recurring { range, pattern } = &self.schedule {
            if range.end < range.start {
                return Err("Series end date must not be before start date".to_string());
            }
            pattern.validate()?;
        }

        Ok(())
    }

    /// Check if this is a recurring series
    pub fn is_recurring(&self) -> bool {
        matches!(self.schedule, Schedule::Recurring { .. })
    }

    pub fn one_time_date(&self) -> Option<NaiveDate> {
        match self.schedule {
            Schedule::OneTime(date) => Some(date),
            Schedule::Recurring { .. } => None,
        }
    }

    pub fn series_range(&self) -> Option<&DateRange> {
        match &self.schedule {
            Schedule::OneTime(_) => None,
            Schedule::Recurring { range, .. } => Some(range),
        }
    }

    pub fn pattern(&self) -> Option<&RecurrencePattern> {
        match &self.schedule {
            Schedule::OneTime(_) => None,
            Schedule::Recurring { pattern, .. } => Some(pattern),
        }
    }

    /// The full date span the booking can occupy.
    pub fn span(&self) -> DateRange {
        match &self.schedule {
            Schedule::OneTime(date) => DateRange::single(*date),
            Schedule::Recurring { range, .. } => *range,
        }
    }

    /// Wall-clock duration of a single occurrence.
    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// Builder for creating bookings with optional fields
pub struct EventBuilder {
    title: Option<String>,
    resource: Option<Resource>,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    schedule: Option<Schedule>,
    notes: Option<String>,
    cost: Option<f64>,
    contact_name: Option<String>,
    contact_phone: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            resource: None,
            start_time: None,
            end_time: None,
            schedule: None,
            notes: None,
            cost: None,
            contact_name: None,
            contact_phone: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Set the wall-clock slot shared by every occurrence
    pub fn times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Schedule as a one-time booking on the given date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.schedule = Some(Schedule::OneTime(date));
        self
    }

    /// Schedule as a recurring series over the given range
    pub fn repeating(mut self, range: DateRange, pattern: RecurrencePattern) -> Self {
        self.schedule = Some(Schedule::Recurring { range, pattern });
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn contact_name(mut self, name: impl Into<String>) -> Self {
        self.contact_name = Some(name.into());
        self
    }

    pub fn contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = Some(phone.into());
        self
    }

    /// Build the booking, validating required fields and invariants
    pub fn build(self) -> Result<Event, String> {
        let title = self.title.ok_or("Booking title is required")?;
        let resource = self.resource.ok_or("Booking resource is required")?;
        let start_time = self.start_time.ok_or("Booking start time is required")?;
        let end_time = self.end_time.ok_or("Booking end time is required")?;
        let schedule = self
            .schedule
            .ok_or("Booking schedule (one-time date or recurring range) is required")?;

        let event = Event {
            id: None,
            title,
            resource,
            start_time,
            end_time,
            schedule,
            notes: self.notes,
            cost: self.cost,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            created_at: None,
            updated_at: None,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recurrence::Frequency;
    use chrono::Weekday;

    fn sample_resource() -> Resource {
        Resource::new(1, 10)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_one_time_success() {
        let event = Event::one_time(
            "Pool party",
            sample_resource(),
            date(2025, 2, 10),
            time(14, 0),
            time(15, 0),
        )
        .unwrap();

        assert_eq!(event.title, "Pool party");
        assert!(!event.is_recurring());
        assert_eq!(event.one_time_date(), Some(date(2025, 2, 10)));
        assert_eq!(event.span(), DateRange::single(date(2025, 2, 10)));
    }

    #[test]
    fn test_one_time_empty_title() {
        let result = Event::one_time(
            "   ",
            sample_resource(),
            date(2025, 2, 10),
            time(14, 0),
            time(15, 0),
        );
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), "Booking title cannot be empty");
    }

    #[test]
    fn test_inverted_times_rejected() {
        let result = Event::one_time(
            "Gym",
            sample_resource(),
            date(2025, 2, 10),
            time(15, 0),
            time(14, 0),
        );
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            "Booking end time must be after start time"
        );
    }

    #[test]
    fn test_equal_times_rejected() {
        let result = Event::one_time(
            "Gym",
            sample_resource(),
            date(2025, 2, 10),
            time(14, 0),
            time(14, 0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_recurring_success() {
        let range = DateRange::new(date(2025, 1, 6), date(2025, 3, 31)).unwrap();
        let pattern = RecurrencePattern::new(Frequency::Weekly, vec![Weekday::Mon]);
        let event = Event::recurring(
            "Weekly swim",
            sample_resource(),
            range,
            pattern,
            time(14, 0),
            time(15, 0),
        )
        .unwrap();

        assert!(event.is_recurring());
        assert!(event.one_time_date().is_none());
        assert_eq!(event.series_range(), Some(&range));
        assert_eq!(event.span(), range);
    }

    #[test]
    fn test_recurring_weekly_without_weekday_rejected() {
        let range = DateRange::new(date(2025, 1, 6), date(2025, 3, 31)).unwrap();
        let pattern = RecurrencePattern::new(Frequency::Weekly, vec![]);
        let result = Event::recurring(
            "Weekly swim",
            sample_resource(),
            range,
            pattern,
            time(14, 0),
            time(15, 0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_optional_fields() {
        let event = Event::builder()
            .title("Tennis court")
            .resource(sample_resource())
            .times(time(9, 0), time(10, 30))
            .on(date(2025, 6, 1))
            .notes("Bring own rackets")
            .cost(25.0)
            .contact_name("Jamie Park")
            .contact_phone("555-0142")
            .build()
            .unwrap();

        assert_eq!(event.notes, Some("Bring own rackets".to_string()));
        assert_eq!(event.cost, Some(25.0));
        assert_eq!(event.contact_name, Some("Jamie Park".to_string()));
        assert_eq!(event.contact_phone, Some("555-0142".to_string()));
    }

    #[test]
    fn test_builder_missing_resource() {
        let result = Event::builder()
            .title("Tennis court")
            .times(time(9, 0), time(10, 0))
            .on(date(2025, 6, 1))
            .build();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), "Booking resource is required");
    }

    #[test]
    fn test_builder_missing_schedule() {
        let result = Event::builder()
            .title("Tennis court")
            .resource(sample_resource())
            .times(time(9, 0), time(10, 0))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let result = Event::builder()
            .title("Tennis court")
            .resource(sample_resource())
            .times(time(9, 0), time(10, 0))
            .on(date(2025, 6, 1))
            .cost(-5.0)
            .build();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), "Booking cost cannot be negative");
    }

    #[test]
    fn test_duration() {
        let event = Event::one_time(
            "Gym",
            sample_resource(),
            date(2025, 2, 10),
            time(14, 0),
            time(15, 30),
        )
        .unwrap();
        assert_eq!(event.duration(), chrono::Duration::minutes(90));
    }
}
