//! The event compiler: resolved records in, calendar components out.
//!
//! Exceptions remove SINGLE and MULTI occurrences outright. RANGE and
//! RECURRING events are never split; their excepted days become EXDATEs on
//! the one component. EXDATEs on a non-recurring component carry no
//! standard meaning, so calendar apps may ignore them.

use chrono::{Duration, NaiveDate};

use crate::component::{CalendarComponent, EventTime};
use crate::error::{EventCalError, EventCalResult};
use crate::event::{EventRecord, EventShape};
use crate::exception::{ExceptionRecord, ExceptionSet};

/// Compile events against exception ranges, preserving input order.
pub fn compile(
    events: &[EventRecord],
    exceptions: &[ExceptionRecord],
) -> EventCalResult<Vec<CalendarComponent>> {
    let excepted = ExceptionSet::build(exceptions)?;
    tracing::debug!(events = events.len(), "compiling events");
    if !excepted.is_empty() {
        tracing::debug!(excepted_days = excepted.len(), "exceptions loaded");
    }

    let mut components = Vec::new();

    for event in events {
        tracing::trace!(
            summary = %event.summary,
            shape = event.shape.name(),
            all_day = event.is_all_day(),
            "compiling event"
        );
        match &event.shape {
            EventShape::Single(date) => {
                if excepted.contains(date) {
                    tracing::debug!(summary = %event.summary, %date, "single date excepted");
                    continue;
                }
                components.push(day_component(event, *date));
            }
            EventShape::Multi(dates) => {
                for date in dates {
                    if excepted.contains(date) {
                        tracing::debug!(summary = %event.summary, %date, "date excepted");
                        continue;
                    }
                    components.push(day_component(event, *date));
                }
            }
            EventShape::Range { start, end } => {
                if end < start {
                    return Err(EventCalError::InvalidRange {
                        context: format!("event '{}'", event.summary),
                        start: start.format("%d.%m.%Y").to_string(),
                        end: end.format("%d.%m.%Y").to_string(),
                    });
                }
                let exdates = excepted
                    .within(*start..=*end)
                    .map(|d| EventTime::on(d, event.start_time()))
                    .collect();
                components.push(CalendarComponent {
                    summary: event.summary.clone(),
                    description: event.description.clone(),
                    start: EventTime::on(*start, event.start_time()),
                    end: end_of(event, *end),
                    recurrence: None,
                    exdates,
                });
            }
            EventShape::Recurring { date, rule } => {
                let exdates = excepted
                    .within(*date..)
                    .map(|d| EventTime::on(d, event.start_time()))
                    .collect();
                components.push(CalendarComponent {
                    summary: event.summary.clone(),
                    description: event.description.clone(),
                    start: EventTime::on(*date, event.start_time()),
                    end: end_of(event, *date),
                    recurrence: Some(rule.clone()),
                    exdates,
                });
            }
        }
    }

    tracing::debug!(components = components.len(), "compiled");
    Ok(components)
}

/// One-day component for SINGLE and MULTI dates.
fn day_component(event: &EventRecord, date: NaiveDate) -> CalendarComponent {
    CalendarComponent {
        summary: event.summary.clone(),
        description: event.description.clone(),
        start: EventTime::on(date, event.start_time()),
        end: end_of(event, date),
        recurrence: None,
        exdates: Vec::new(),
    }
}

/// End instant for a span whose last covered day is `last_day`.
/// All-day ends are exclusive: the day after.
fn end_of(event: &EventRecord, last_day: NaiveDate) -> EventTime {
    match event.end_time() {
        Some(time) => EventTime::DateTimeFloating(last_day.and_time(time)),
        None => EventTime::Date(last_day + Duration::days(1)),
    }
}
