use std::path::Path;

use anyhow::{Context, Result};
use eventcal_core::ShapePolicy;
use eventcal_core::definition::Definition;
use eventcal_core::ics::generate_calendar;
use owo_colors::OwoColorize;

pub fn run(input: &Path, output: &Path, policy: ShapePolicy, product_id: &str) -> Result<()> {
    let definition = Definition::load(input)
        .with_context(|| format!("Failed to read definition file {}", input.display()))?;

    let components = definition.compile(policy)?;
    let ics = generate_calendar(&components, product_id)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(output, ics).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} {}",
        ".ics file created:".green(),
        output.display(),
        format!("({} events)", components.len()).dimmed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_writes_calendar_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("events.toml");
        let output = dir.path().join("out/events.ics");
        std::fs::write(
            &input,
            "[[events]]\nsummary = \"Flea market\"\ndate = \"18.10.2024\"\nstart_time = \"10:00\"\nend_time = \"12:00\"\n",
        )
        .unwrap();

        run(&input, &output, ShapePolicy::Priority, "EVENTCAL").unwrap();

        let ics = std::fs::read_to_string(&output).unwrap();
        assert!(ics.contains("SUMMARY:Flea market"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTART:20241018T100000"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_demo_definition() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/events.toml");
        let output = dir.path().join("demo.ics");

        run(&input, &output, ShapePolicy::Strict, "EVENTCAL").unwrap();

        let ics = std::fs::read_to_string(&output).unwrap();
        // 1 single + 3 of 4 singing dates + 1 closure + 1 recurring
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 6, "ICS:\n{}", ics);
        assert!(ics.contains("RRULE:FREQ=WEEKLY;INTERVAL=2;UNTIL=20250601"), "ICS:\n{}", ics);
        assert!(ics.contains("EXDATE;VALUE=DATE:20250501"), "ICS:\n{}", ics);
        assert!(!ics.contains("20241202"), "Excepted date must not appear. ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_bad_record_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("events.toml");
        let output = dir.path().join("events.ics");
        std::fs::write(&input, "[[events]]\nsummary = \"Typo\"\ndate = \"2024-10-18\"\n").unwrap();

        let err = run(&input, &output, ShapePolicy::Priority, "EVENTCAL").unwrap_err();

        assert!(err.to_string().contains("dd.mm.yyyy"), "Got: {}", err);
        assert!(!output.exists());
    }
}
