//! Resolved event records.
//!
//! An `EventRecord` is a definition whose temporal shape has been decided
//! once, up front, and whose dates and times have been parsed. The compiler
//! only ever sees these.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::date_format::{parse_date, parse_time};
use crate::definition::{EventDefinition, RecurrenceDefinition};
use crate::error::{EventCalError, EventCalResult};
use crate::recurrence::{Frequency, RecurrenceRule, Terminator};

/// What to do when a definition carries keys for more than one shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapePolicy {
    /// Pick by priority: MULTI > RANGE > RECURRING > SINGLE
    #[default]
    Priority,
    /// Fail with `AmbiguousShape`
    Strict,
}

/// Start and end time of day for a timed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventShape {
    Single(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
    Multi(Vec<NaiveDate>),
    Recurring { date: NaiveDate, rule: RecurrenceRule },
}

impl EventShape {
    pub fn name(&self) -> &'static str {
        match self {
            EventShape::Single(_) => "single",
            EventShape::Range { .. } => "range",
            EventShape::Multi(_) => "multi",
            EventShape::Recurring { .. } => "recurring",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub summary: String,
    pub description: Option<String>,
    /// `None` for all-day events
    pub times: Option<TimeOfDay>,
    pub shape: EventShape,
}

impl EventRecord {
    /// Resolve a raw definition. `index` is only used in error messages.
    pub fn resolve(def: &EventDefinition, index: usize, policy: ShapePolicy) -> EventCalResult<Self> {
        let context = match &def.summary {
            Some(s) => format!("event #{} ('{}')", index + 1, s),
            None => format!("event #{}", index + 1),
        };

        let summary = def.summary.clone().ok_or_else(|| EventCalError::MissingField {
            field: "summary",
            context: context.clone(),
        })?;

        let shape = resolve_shape(def, &context, policy)?;
        let times = resolve_times(def, &context)?;

        Ok(EventRecord {
            summary,
            description: def.description.clone(),
            times,
            shape,
        })
    }

    pub fn is_all_day(&self) -> bool {
        self.times.is_none()
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        self.times.map(|t| t.start)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        self.times.map(|t| t.end)
    }
}

fn resolve_shape(def: &EventDefinition, context: &str, policy: ShapePolicy) -> EventCalResult<EventShape> {
    let has_range = match (&def.date_start, &def.date_end) {
        (Some(_), Some(_)) => true,
        (None, None) => false,
        (Some(_), None) => {
            return Err(EventCalError::MissingField {
                field: "date_end",
                context: context.to_string(),
            });
        }
        (None, Some(_)) => {
            return Err(EventCalError::MissingField {
                field: "date_start",
                context: context.to_string(),
            });
        }
    };

    // A bare `date` belongs to RECURRING when a recurrence is present
    let candidates: Vec<&str> = [
        (def.dates.is_some(), "dates"),
        (has_range, "date_start/date_end"),
        (def.recurrence.is_some(), "recurrence"),
        (def.date.is_some() && def.recurrence.is_none(), "date"),
    ]
    .into_iter()
    .filter_map(|(present, name)| present.then_some(name))
    .collect();

    if policy == ShapePolicy::Strict && candidates.len() > 1 {
        return Err(EventCalError::AmbiguousShape {
            context: context.to_string(),
            shapes: candidates.join(", "),
        });
    }

    if let Some(dates) = &def.dates {
        let dates = dates
            .iter()
            .map(|d| parse_date(d))
            .collect::<EventCalResult<Vec<_>>>()?;
        return Ok(EventShape::Multi(dates));
    }

    if let (Some(start), Some(end)) = (&def.date_start, &def.date_end) {
        return Ok(EventShape::Range {
            start: parse_date(start)?,
            end: parse_date(end)?,
        });
    }

    if let Some(recurrence) = &def.recurrence {
        let date = def.date.as_deref().ok_or_else(|| EventCalError::MissingField {
            field: "date",
            context: context.to_string(),
        })?;
        return Ok(EventShape::Recurring {
            date: parse_date(date)?,
            rule: resolve_recurrence(recurrence)?,
        });
    }

    match &def.date {
        Some(date) => Ok(EventShape::Single(parse_date(date)?)),
        None => Err(EventCalError::MissingField {
            field: "date",
            context: context.to_string(),
        }),
    }
}

fn resolve_recurrence(def: &RecurrenceDefinition) -> EventCalResult<RecurrenceRule> {
    let frequency = Frequency::from_ics_str(&def.freq).ok_or_else(|| {
        EventCalError::InvalidRecurrence(format!(
            "unknown freq '{}', expected DAILY, WEEKLY, MONTHLY or YEARLY",
            def.freq
        ))
    })?;

    // count wins over until
    let terminator = match (def.count, &def.until) {
        (Some(n), _) => Terminator::Count(n),
        (None, Some(until)) => Terminator::Until(parse_date(until)?),
        (None, None) => Terminator::Never,
    };

    RecurrenceRule::new(frequency, def.interval, terminator)
}

/// Timed iff both times are present. A lone time is ignored and the event
/// is treated as all-day.
fn resolve_times(def: &EventDefinition, context: &str) -> EventCalResult<Option<TimeOfDay>> {
    match (&def.start_time, &def.end_time) {
        (Some(start), Some(end)) => Ok(Some(TimeOfDay {
            start: parse_time(start)?,
            end: parse_time(end)?,
        })),
        (None, None) => Ok(None),
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!(
                "{} has only one of start_time/end_time; treating it as all-day",
                context
            );
            Ok(None)
        }
    }
}
