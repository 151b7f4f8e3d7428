use std::path::Path;

use anyhow::{Context, Result};
use eventcal_core::component::CalendarComponent;
use eventcal_core::ics::parse_calendar;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let components = parse_calendar(&content)?;

    if components.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for component in &components {
        println!("{}", component.render());
    }

    println!();
    println!("{}", tally(&components).dimmed());

    Ok(())
}

fn tally(components: &[CalendarComponent]) -> String {
    let recurring = components.iter().filter(|c| c.is_recurring()).count();
    format!("{} events, {} recurring", components.len(), recurring)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_counts_recurring_events() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:a\r\n\
SUMMARY:Choir\r\n\
DTSTART;VALUE=DATE:20240101\r\n\
DTEND;VALUE=DATE:20240102\r\n\
RRULE:FREQ=WEEKLY;INTERVAL=2;COUNT=4\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:b\r\n\
SUMMARY:Market\r\n\
DTSTART:20240105T100000\r\n\
DTEND:20240105T120000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let components = parse_calendar(ics).unwrap();
        assert_eq!(tally(&components), "2 events, 1 recurring");

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("events.ics");
        std::fs::write(&file, ics).unwrap();
        run(&file).unwrap();
    }
}
