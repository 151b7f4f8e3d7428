//! Compile a definition, serialize it and read it back.

use chrono::NaiveDate;
use eventcal_core::ics::{generate_calendar, parse_calendar};
use eventcal_core::recurrence::expand_occurrences;
use eventcal_core::{Definition, EventTime, ShapePolicy, Terminator};

const DEFINITION: &str = r#"
[[events]]
summary = "Single Day Event"
date = "01.01.2023"

[[events]]
summary = "Multi Day Event"
date_start = "01.01.2023"
date_end = "03.01.2023"

[[events]]
summary = "Recurring Event"
date = "01.01.2023"
recurrence = { freq = "DAILY", interval = 1, count = 5 }

[[events]]
summary = "Multiple Specific Dates Event"
dates = ["01.01.2023", "05.01.2023", "10.01.2023"]

[[events]]
summary = "Timed Event"
description = "Room 4"
date = "03.01.2023"
start_time = "10:00"
end_time = "12:00"

[[exceptions]]
title = "Birthday"
date_start = "02.01.2023"
date_end = "02.01.2023"

[[exceptions]]
reason = "Public holiday"
date_start = "05.01.2023"
date_end = "05.01.2023"
"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn compile_generate_parse_roundtrip() {
    let definition = Definition::from_toml(DEFINITION).unwrap();
    let compiled = definition.compile(ShapePolicy::Priority).unwrap();

    let ics = generate_calendar(&compiled, "EVENTCAL").unwrap();
    let parsed = parse_calendar(&ics).expect("Should parse generated ICS");

    assert_eq!(parsed.len(), compiled.len());
    for (original, reparsed) in compiled.iter().zip(&parsed) {
        assert_eq!(original.summary, reparsed.summary);
        assert_eq!(original.start, reparsed.start, "start of {}", original.summary);
        assert_eq!(original.end, reparsed.end, "end of {}", original.summary);
        assert_eq!(original.exdates, reparsed.exdates, "exdates of {}", original.summary);
        assert_eq!(original.recurrence, reparsed.recurrence);
        assert_eq!(original.description, reparsed.description);
    }
}

#[test]
fn compiled_shapes_match_expected_layout() {
    let definition = Definition::from_toml(DEFINITION).unwrap();
    let compiled = definition.compile(ShapePolicy::Priority).unwrap();

    let summaries: Vec<&str> = compiled.iter().map(|c| c.summary.as_str()).collect();
    assert_eq!(
        summaries,
        vec![
            "Single Day Event",
            "Multi Day Event",
            "Recurring Event",
            "Multiple Specific Dates Event",
            "Multiple Specific Dates Event",
            "Timed Event",
        ]
    );

    let range = &compiled[1];
    assert_eq!(range.end, EventTime::Date(date(2023, 1, 4)));
    assert_eq!(range.exdates, vec![EventTime::Date(date(2023, 1, 2))]);

    let recurring = &compiled[2];
    assert_eq!(
        recurring.recurrence.as_ref().unwrap().terminator,
        Terminator::Count(5)
    );
    assert_eq!(
        recurring.exdates,
        vec![EventTime::Date(date(2023, 1, 2)), EventTime::Date(date(2023, 1, 5))]
    );

    assert_eq!(compiled[3].start, EventTime::Date(date(2023, 1, 1)));
    assert_eq!(compiled[4].start, EventTime::Date(date(2023, 1, 10)));
}

#[test]
fn recurring_occurrences_skip_exception_days() {
    let definition = Definition::from_toml(DEFINITION).unwrap();
    let compiled = definition.compile(ShapePolicy::Priority).unwrap();

    let occurrences = expand_occurrences(&compiled[2], date(2023, 1, 1), date(2023, 1, 31)).unwrap();
    let days: Vec<NaiveDate> = occurrences.iter().map(|o| o.start.date()).collect();

    // COUNT=5 spans Jan 1-5; Jan 2 and Jan 5 are excluded
    assert_eq!(days, vec![date(2023, 1, 1), date(2023, 1, 3), date(2023, 1, 4)]);
}

#[test]
fn strict_policy_rejects_mixed_definition() {
    let definition = Definition::from_toml(
        r#"
[[events]]
summary = "Mixed"
date = "01.01.2023"
dates = ["02.01.2023"]
"#,
    )
    .unwrap();

    assert!(definition.compile(ShapePolicy::Strict).is_err());
    assert_eq!(definition.compile(ShapePolicy::Priority).unwrap().len(), 1);
}
