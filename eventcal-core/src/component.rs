//! Calendar components produced by the compiler.
//!
//! A `CalendarComponent` maps one-to-one onto a VEVENT in the generated
//! calendar. All instants are naive local values; no timezone is attached.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::recurrence::RecurrenceRule;

/// A start, end or exclusion instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),
    /// Local date-time without TZID or Z suffix
    DateTimeFloating(NaiveDateTime),
}

impl EventTime {
    /// Build an instant on `date`, timed when `time` is given.
    pub fn on(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        match time {
            Some(t) => EventTime::DateTimeFloating(date.and_time(t)),
            None => EventTime::Date(date),
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTimeFloating(dt) => dt.date(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Shift by a duration, keeping the variant. Dates move by whole days.
    pub fn shifted(&self, by: Duration) -> Self {
        match self {
            EventTime::Date(d) => EventTime::Date(*d + Duration::days(by.num_days())),
            EventTime::DateTimeFloating(dt) => EventTime::DateTimeFloating(*dt + by),
        }
    }

    /// Midnight for dates, the value itself otherwise.
    pub fn to_naive(&self) -> NaiveDateTime {
        match self {
            EventTime::Date(d) => d.and_time(NaiveTime::MIN),
            EventTime::DateTimeFloating(dt) => *dt,
        }
    }

    /// Format as an ICS property value (`20230101` or `20230101T100000`).
    pub fn to_ics_string(&self) -> String {
        match self {
            EventTime::Date(d) => d.format("%Y%m%d").to_string(),
            EventTime::DateTimeFloating(dt) => dt.format("%Y%m%dT%H%M%S").to_string(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M")),
        }
    }
}

/// One emitted calendar component (VEVENT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarComponent {
    pub summary: String,
    pub description: Option<String>,
    pub start: EventTime,
    /// Exclusive for all-day components: the day after the last covered day
    pub end: EventTime,
    pub recurrence: Option<RecurrenceRule>,
    /// EXDATE values, same variant as `start`
    pub exdates: Vec<EventTime>,
}

impl CalendarComponent {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn duration(&self) -> Duration {
        self.end.to_naive() - self.start.to_naive()
    }
}
