//! Terminal rendering for eventcal-core types.
//!
//! Extension traits that add colored output using owo_colors.

use eventcal_core::component::{CalendarComponent, EventTime};
use eventcal_core::recurrence::Occurrence;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Occurrence {
    fn render(&self) -> String {
        format!("{} {}", render_span(&self.start, &self.end).dimmed(), self.summary)
    }
}

impl Render for CalendarComponent {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.summary.bold(),
            render_span(&self.start, &self.end).dimmed()
        )];

        if let Some(ref desc) = self.description {
            lines.push(format!("   {}", desc));
        }
        if let Some(ref rule) = self.recurrence {
            lines.push(format!("   {} {}", "repeats".cyan(), rule));
        }
        if !self.exdates.is_empty() {
            let exdates: Vec<String> = self.exdates.iter().map(|e| e.to_string()).collect();
            lines.push(format!("   {} {}", "except".yellow(), exdates.join(", ")));
        }

        lines.join("\n")
    }
}

/// "all day" for one-day date spans, otherwise "start → end".
/// All-day ends are exclusive, so the last shown day is the one before.
fn render_span(start: &EventTime, end: &EventTime) -> String {
    match (start, end) {
        (EventTime::Date(s), EventTime::Date(e)) => {
            let last = e.pred_opt().unwrap_or(*e);
            if last <= *s {
                format!("{} (all day)", s)
            } else {
                format!("{} → {} (all day)", s, last)
            }
        }
        (EventTime::DateTimeFloating(s), EventTime::DateTimeFloating(e)) if s.date() == e.date() => {
            format!("{} {}–{}", s.date(), s.format("%H:%M"), e.format("%H:%M"))
        }
        _ => format!("{} → {}", start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_single_all_day() {
        let span = render_span(
            &EventTime::Date(date(2023, 1, 1)),
            &EventTime::Date(date(2023, 1, 2)),
        );
        assert_eq!(span, "2023-01-01 (all day)");
    }

    #[test]
    fn test_render_range_shows_last_covered_day() {
        let span = render_span(
            &EventTime::Date(date(2024, 12, 23)),
            &EventTime::Date(date(2025, 1, 1)),
        );
        assert_eq!(span, "2024-12-23 → 2024-12-31 (all day)");
    }

    #[test]
    fn test_render_same_day_timed() {
        let d = date(2024, 10, 18);
        let span = render_span(
            &EventTime::DateTimeFloating(d.and_hms_opt(10, 0, 0).unwrap()),
            &EventTime::DateTimeFloating(d.and_hms_opt(12, 0, 0).unwrap()),
        );
        assert_eq!(span, "2024-10-18 10:00–12:00");
    }
}
