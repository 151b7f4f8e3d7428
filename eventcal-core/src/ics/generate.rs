//! ICS file generation.

use chrono::Utc;
use icalendar::{Calendar, Component, Property, ValueType};
use uuid::Uuid;

use crate::component::{CalendarComponent, EventTime};
use crate::error::{EventCalError, EventCalResult};

/// Generate one VCALENDAR holding a VEVENT per component.
pub fn generate_calendar(components: &[CalendarComponent], product_id: &str) -> EventCalResult<String> {
    if product_id.trim().is_empty() || product_id.contains(['\r', '\n']) {
        return Err(EventCalError::IcsGenerate(format!(
            "invalid product id '{}'",
            product_id
        )));
    }

    let mut cal = Calendar::new();
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for component in components {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&Uuid::new_v4().to_string());
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.summary(&component.summary);

        if let Some(ref desc) = component.description {
            ics_event.description(desc);
        }

        add_datetime_property(&mut ics_event, "DTSTART", &component.start);
        add_datetime_property(&mut ics_event, "DTEND", &component.end);

        if let Some(ref rule) = component.recurrence {
            ics_event.add_property("RRULE", rule.to_string());
        }

        for exdate in &component.exdates {
            add_exdate_property(&mut ics_event, exdate);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string(), product_id))
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with the configured product id
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str, product_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(product_id);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Add DTSTART/DTEND, tagging all-day values with VALUE=DATE
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(_) => {
            let mut prop = Property::new(name, time.to_ics_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::DateTimeFloating(_) => {
            // Floating datetime (no Z, no TZID)
            ics_event.add_property(name, time.to_ics_string());
        }
    }
}

/// Add an EXDATE property for a single exclusion, matching DTSTART's value type
fn add_exdate_property(ics_event: &mut icalendar::Event, time: &EventTime) {
    let mut prop = Property::new("EXDATE", time.to_ics_string());
    if time.is_all_day() {
        prop.append_parameter(ValueType::Date);
    }
    ics_event.append_multi_property(prop);
}
