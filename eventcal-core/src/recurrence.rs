//! Recurrence rules and RRULE expansion.
//!
//! `RecurrenceRule` is the compiled form of a definition's `recurrence`
//! table. It renders to (and parses from) the RRULE value text, and
//! `expand_occurrences` uses the rrule crate to list concrete instances
//! of a component inside a date window, respecting EXDATEs.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::component::{CalendarComponent, EventTime};
use crate::error::{EventCalError, EventCalResult};

/// Upper bound on instances returned for a single window.
const MAX_OCCURRENCES: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Case-insensitive, so `weekly` in a definition file works too.
    pub fn from_ics_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Frequency::Daily),
            "WEEKLY" => Some(Frequency::Weekly),
            "MONTHLY" => Some(Frequency::Monthly),
            "YEARLY" => Some(Frequency::Yearly),
            _ => None,
        }
    }
}

/// How a recurrence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminator {
    /// COUNT=n
    Count(u32),
    /// UNTIL=yyyymmdd, inclusive, always date-only
    Until(NaiveDate),
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    pub terminator: Terminator,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency, interval: u32, terminator: Terminator) -> EventCalResult<Self> {
        if interval == 0 {
            return Err(EventCalError::InvalidRecurrence(
                "interval must be a positive integer".into(),
            ));
        }
        if terminator == Terminator::Count(0) {
            return Err(EventCalError::InvalidRecurrence(
                "count must be a positive integer".into(),
            ));
        }
        Ok(RecurrenceRule {
            frequency,
            interval,
            terminator,
        })
    }
}

impl fmt::Display for RecurrenceRule {
    /// RRULE value, e.g. `FREQ=WEEKLY;INTERVAL=2;UNTIL=20250601`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FREQ={};INTERVAL={}",
            self.frequency.as_ics_str(),
            self.interval
        )?;
        match self.terminator {
            Terminator::Count(n) => write!(f, ";COUNT={}", n),
            Terminator::Until(d) => write!(f, ";UNTIL={}", d.format("%Y%m%d")),
            Terminator::Never => Ok(()),
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = EventCalError;

    /// Parse an RRULE value. Parts other than FREQ, INTERVAL, COUNT and
    /// UNTIL are rejected since they cannot be represented.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut frequency = None;
        let mut interval = 1;
        let mut terminator = Terminator::Never;

        for part in s.trim().split(';').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                EventCalError::InvalidRecurrence(format!("malformed RRULE part '{}'", part))
            })?;
            match key.to_ascii_uppercase().as_str() {
                "FREQ" => {
                    frequency = Some(Frequency::from_ics_str(value).ok_or_else(|| {
                        EventCalError::InvalidRecurrence(format!("unsupported FREQ '{}'", value))
                    })?);
                }
                "INTERVAL" => {
                    interval = value.parse().map_err(|_| {
                        EventCalError::InvalidRecurrence(format!("bad INTERVAL '{}'", value))
                    })?;
                }
                "COUNT" => {
                    let n = value.parse().map_err(|_| {
                        EventCalError::InvalidRecurrence(format!("bad COUNT '{}'", value))
                    })?;
                    terminator = Terminator::Count(n);
                }
                "UNTIL" => {
                    // Date part only; a time or Z suffix is dropped
                    let date_part = value.get(..8).unwrap_or(value);
                    let d = NaiveDate::parse_from_str(date_part, "%Y%m%d").map_err(|_| {
                        EventCalError::InvalidRecurrence(format!("bad UNTIL '{}'", value))
                    })?;
                    terminator = Terminator::Until(d);
                }
                other => {
                    return Err(EventCalError::InvalidRecurrence(format!(
                        "unsupported RRULE part '{}'",
                        other
                    )));
                }
            }
        }

        let frequency = frequency
            .ok_or_else(|| EventCalError::InvalidRecurrence("RRULE without FREQ".into()))?;
        RecurrenceRule::new(frequency, interval, terminator)
    }
}

/// One concrete instance of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

/// Build an iCalendar-format rule set string for the rrule crate parser.
///
/// Floating values are handed to rrule as UTC; no conversion happens so
/// the wall-clock value is preserved. UNTIL is widened to the last second
/// of its day to keep it inclusive for timed starts.
fn build_rrule_string(start: &EventTime, rule: &RecurrenceRule, exdates: &[EventTime]) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "DTSTART:{}Z",
        start.to_naive().format("%Y%m%dT%H%M%S")
    ));

    let mut rrule = format!(
        "FREQ={};INTERVAL={}",
        rule.frequency.as_ics_str(),
        rule.interval
    );
    match rule.terminator {
        Terminator::Count(n) => rrule.push_str(&format!(";COUNT={}", n)),
        Terminator::Until(d) => rrule.push_str(&format!(";UNTIL={}T235959Z", d.format("%Y%m%d"))),
        Terminator::Never => {}
    }
    lines.push(format!("RRULE:{}", rrule));

    for exdate in exdates {
        lines.push(format!(
            "EXDATE:{}Z",
            exdate.to_naive().format("%Y%m%dT%H%M%S")
        ));
    }

    lines.join("\n")
}

/// Expand a component into its occurrences within `[from, to]` (inclusive dates).
///
/// Non-recurring components yield themselves when their span touches the
/// window. Their EXDATEs are not applied: a ranged component stays one span.
pub fn expand_occurrences(
    component: &CalendarComponent,
    from: NaiveDate,
    to: NaiveDate,
) -> EventCalResult<Vec<Occurrence>> {
    let Some(rule) = &component.recurrence else {
        let last_day = match component.end {
            EventTime::Date(d) => d - Duration::days(1),
            EventTime::DateTimeFloating(dt) => dt.date(),
        };
        if component.start.date() <= to && last_day >= from {
            return Ok(vec![Occurrence {
                summary: component.summary.clone(),
                start: component.start,
                end: component.end,
            }]);
        }
        return Ok(Vec::new());
    };

    let rrule_str = build_rrule_string(&component.start, rule, &component.exdates);
    let rrule_set: RRuleSet = rrule_str.parse().map_err(|e| {
        EventCalError::InvalidRecurrence(format!(
            "Failed to parse RRULE for '{}': {}",
            component.summary, e
        ))
    })?;

    // Widen by one second so instants on the window edges are kept
    let tz: rrule::Tz = Utc.into();
    let after = (from.and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1)).with_timezone(&tz);
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    let before = to.and_time(last_second).and_utc().with_timezone(&tz);

    let result = rrule_set.after(after).before(before).all(MAX_OCCURRENCES);
    if result.limited {
        tracing::warn!(
            summary = %component.summary,
            limit = MAX_OCCURRENCES,
            "occurrence window truncated"
        );
    }

    let duration = component.duration();
    let occurrences = result
        .dates
        .iter()
        .map(|occ| {
            let start = match component.start {
                EventTime::Date(_) => EventTime::Date(occ.date_naive()),
                EventTime::DateTimeFloating(_) => EventTime::DateTimeFloating(occ.naive_utc()),
            };
            Occurrence {
                summary: component.summary.clone(),
                start,
                end: start.shifted(duration),
            }
        })
        .collect();

    Ok(occurrences)
}
