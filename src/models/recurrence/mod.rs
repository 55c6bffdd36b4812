// Recurrence module
// Describes how often and on which weekdays a booking series repeats

use chrono::{Datelike, NaiveDate, Weekday};

/// How often a recurring booking fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
}

impl Frequency {
    /// Store code for the `recurring_patterns.frequency` column.
    pub fn as_code(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::BiWeekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }

    pub fn from_code(code: &str) -> Option<Frequency> {
        match code {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "biweekly" => Some(Frequency::BiWeekly),
            "monthly" => Some(Frequency::Monthly),
            "quarterly" => Some(Frequency::Quarterly),
            _ => None,
        }
    }

    /// Weekly and BiWeekly series fire on explicit weekdays and require
    /// at least one to be selected.
    pub fn requires_weekdays(&self) -> bool {
        matches!(self, Frequency::Weekly | Frequency::BiWeekly)
    }
}

/// Describes how a booking series repeats.
///
/// `weekdays` is an ordered list: for Weekly/BiWeekly it names the
/// weekday(s) the series fires on; for Monthly/Quarterly it selects which
/// weekday(s) the nth-weekday-of-month rule applies to; for Daily a
/// non-empty list restricts the series to those weekdays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub id: Option<i64>,
    pub frequency: Frequency,
    pub weekdays: Vec<Weekday>,
}

impl RecurrencePattern {
    pub fn new(frequency: Frequency, weekdays: Vec<Weekday>) -> Self {
        Self {
            id: None,
            frequency,
            weekdays,
        }
    }

    /// Validate the pattern.
    pub fn validate(&self) -> Result<(), String> {
        if self.frequency.requires_weekdays() && self.weekdays.is_empty() {
            return Err(format!(
                "{} recurrence requires at least one weekday",
                self.frequency.as_code()
            ));
        }
        Ok(())
    }

    /// The weekdays the series actually fires on, defaulting to the
    /// weekday of the series' own start date when none were selected.
    pub fn effective_weekdays(&self, series_start: NaiveDate) -> Vec<Weekday> {
        if self.weekdays.is_empty() {
            vec![series_start.weekday()]
        } else {
            self.weekdays.clone()
        }
    }
}
