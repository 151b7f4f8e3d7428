//! ICS file parsing using the icalendar crate's parser.

use icalendar::{
    DatePerhapsTime,
    parser::{Property, read_calendar, unfold},
};

use crate::component::{CalendarComponent, EventTime};
use crate::error::{EventCalError, EventCalResult};
use crate::recurrence::RecurrenceRule;

/// Parse ICS content into one `CalendarComponent` per VEVENT.
pub fn parse_calendar(content: &str) -> EventCalResult<Vec<CalendarComponent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| EventCalError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .enumerate()
        .map(|(index, vevent)| -> EventCalResult<CalendarComponent> {
            let context =
                |what: &str| EventCalError::IcsParse(format!("VEVENT #{}: {}", index + 1, what));

            let summary = vevent
                .find_prop("SUMMARY")
                .map(|p| p.val.to_string())
                .unwrap_or_else(|| "(No title)".to_string());
            let description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());

            let start = vevent
                .find_prop("DTSTART")
                .and_then(|p| DatePerhapsTime::try_from(p).ok())
                .map(to_event_time)
                .ok_or_else(|| context("missing or invalid DTSTART"))?;
            let end = vevent
                .find_prop("DTEND")
                .and_then(|p| DatePerhapsTime::try_from(p).ok())
                .map(to_event_time)
                .ok_or_else(|| context("missing or invalid DTEND"))?;

            let recurrence = vevent
                .find_prop("RRULE")
                .map(|p| p.val.as_ref().parse::<RecurrenceRule>())
                .transpose()?;

            let exdates: Vec<EventTime> = vevent
                .properties
                .iter()
                .filter(|p| p.name == "EXDATE")
                .flat_map(parse_exdate_property)
                .collect();

            Ok(CalendarComponent {
                summary,
                description,
                start,
                end,
                recurrence,
                exdates,
            })
        })
        .collect()
}

/// Convert icalendar's DatePerhapsTime to our EventTime.
/// UTC and zoned values keep their wall-clock value; nothing is converted.
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => EventTime::DateTimeFloating(dt.naive_utc()),
            icalendar::CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            icalendar::CalendarDateTime::WithTimezone { date_time, .. } => {
                EventTime::DateTimeFloating(date_time)
            }
        },
    }
}

/// Parse an EXDATE property into a list of EventTime values.
///
/// Handles:
/// - VALUE=DATE: `EXDATE;VALUE=DATE:20240108`
/// - Floating: `EXDATE:20240108T100000`
/// - UTC (`Z`) and TZID forms, reduced to their wall-clock value
/// - Comma-separated values: `EXDATE;VALUE=DATE:20240108,20240115`
fn parse_exdate_property(prop: &Property) -> Vec<EventTime> {
    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    prop.val
        .as_ref()
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if is_date {
                chrono::NaiveDate::parse_from_str(s, "%Y%m%d")
                    .ok()
                    .map(EventTime::Date)
            } else {
                chrono::NaiveDateTime::parse_from_str(s.trim_end_matches('Z'), "%Y%m%dT%H%M%S")
                    .ok()
                    .map(EventTime::DateTimeFloating)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{Frequency, Terminator};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_all_day_recurring_event() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:test-123
SUMMARY:Recurring Event
DTSTART;VALUE=DATE:20230101
DTEND;VALUE=DATE:20230102
RRULE:FREQ=DAILY;INTERVAL=1;COUNT=5
EXDATE;VALUE=DATE:20230102
EXDATE;VALUE=DATE:20230105
END:VEVENT
END:VCALENDAR"#;

        let components = parse_calendar(ics).expect("Should parse");

        assert_eq!(components.len(), 1);
        let component = &components[0];
        assert_eq!(component.summary, "Recurring Event");
        assert_eq!(component.start, EventTime::Date(date(2023, 1, 1)));
        assert_eq!(component.end, EventTime::Date(date(2023, 1, 2)));
        let rule = component.recurrence.as_ref().expect("Should have RRULE");
        assert_eq!(rule.frequency, Frequency::Daily);
        assert_eq!(rule.terminator, Terminator::Count(5));
        assert_eq!(
            component.exdates,
            vec![
                EventTime::Date(date(2023, 1, 2)),
                EventTime::Date(date(2023, 1, 5)),
            ]
        );
    }

    #[test]
    fn test_parse_comma_separated_exdates() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:test-123
SUMMARY:Weekly
DTSTART:20240101T100000
DTEND:20240101T110000
RRULE:FREQ=WEEKLY
EXDATE:20240108T100000,20240115T100000Z
END:VEVENT
END:VCALENDAR"#;

        let components = parse_calendar(ics).expect("Should parse");

        let exdates: Vec<String> = components[0].exdates.iter().map(|e| e.to_string()).collect();
        assert_eq!(exdates, vec!["2024-01-08T10:00", "2024-01-15T10:00"]);
    }

    #[test]
    fn test_parse_zoned_start_keeps_wall_clock() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:test-123
SUMMARY:Zoned
DTSTART;TZID=Europe/Berlin:20240101T100000
DTEND;TZID=Europe/Berlin:20240101T110000
END:VEVENT
END:VCALENDAR"#;

        let components = parse_calendar(ics).expect("Should parse");

        assert_eq!(components[0].start.to_string(), "2024-01-01T10:00");
        assert_eq!(components[0].end.to_string(), "2024-01-01T11:00");
    }

    #[test]
    fn test_parse_line_folding_preserves_whitespace() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:test-123\r\n\
SUMMARY:Test\r\n\
DTSTART;VALUE=DATE:20240101\r\n\
DTEND;VALUE=DATE:20240102\r\n\
DESCRIPTION:Hello \r\n world and \r\n more text\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

        let components = parse_calendar(ics).expect("Should parse");

        assert_eq!(
            components[0].description.as_deref(),
            Some("Hello world and more text"),
            "Line folding should preserve the space before 'world'"
        );
    }

    #[test]
    fn test_parse_missing_dtend_is_error() {
        let ics = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:TEST
BEGIN:VEVENT
UID:test-123
SUMMARY:No end
DTSTART;VALUE=DATE:20240101
END:VEVENT
END:VCALENDAR"#;

        let err = parse_calendar(ics).unwrap_err();
        assert!(err.to_string().contains("DTEND"), "Got: {}", err);
    }
}
