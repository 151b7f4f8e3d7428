//! Parsing of the fixed `dd.mm.yyyy` / `HH:MM` text formats used in definitions.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{EventCalError, EventCalResult};

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a `dd.mm.yyyy` date.
pub fn parse_date(s: &str) -> EventCalResult<NaiveDate> {
    let err = || EventCalError::DateParse {
        kind: "date",
        value: s.to_string(),
        pattern: "dd.mm.yyyy",
    };
    let trimmed = s.trim();
    if !matches_layout(trimmed, "dd.dd.dddd") {
        return Err(err());
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| err())
}

/// Parse a 24-hour `HH:MM` time of day.
pub fn parse_time(s: &str) -> EventCalResult<NaiveTime> {
    let err = || EventCalError::DateParse {
        kind: "time",
        value: s.to_string(),
        pattern: "HH:MM",
    };
    let trimmed = s.trim();
    if !matches_layout(trimmed, "dd:dd") {
        return Err(err());
    }
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT).map_err(|_| err())
}

/// chrono accepts unpadded fields (`1.1.2023`); the formats are fixed-width.
/// `d` in `layout` stands for an ASCII digit, anything else must match.
fn matches_layout(s: &str, layout: &str) -> bool {
    s.len() == layout.len()
        && s.bytes().zip(layout.bytes()).all(|(c, l)| match l {
            b'd' => c.is_ascii_digit(),
            _ => c == l,
        })
}
