use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Duration, Local, NaiveDate};
use eventcal_core::ShapePolicy;
use eventcal_core::definition::Definition;
use eventcal_core::recurrence::{Occurrence, expand_occurrences};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(input: &Path, from: Option<&str>, within: &str, policy: ShapePolicy) -> Result<()> {
    let from = match from {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))?,
        None => Local::now().date_naive(),
    };
    let Some(to) = from.checked_add_signed(window_days(within)?) else {
        bail!("Window '{}' is too large", within);
    };

    let definition = Definition::load(input)
        .with_context(|| format!("Failed to read definition file {}", input.display()))?;
    let components = definition.compile(policy)?;

    let mut occurrences: Vec<Occurrence> = Vec::new();
    for component in &components {
        occurrences.extend(expand_occurrences(component, from, to)?);
    }
    occurrences.sort_by_key(|o| o.start.to_naive());

    if occurrences.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let mut current_date: Option<NaiveDate> = None;
    for occurrence in &occurrences {
        let date = occurrence.start.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date.format("%a %d.%m.%Y").to_string().bold());
            current_date = Some(date);
        }
        println!("  {}", occurrence.render());
    }

    Ok(())
}

/// Whole days in a humantime duration, at least one.
fn window_days(within: &str) -> Result<Duration> {
    let window = humantime::parse_duration(within)
        .with_context(|| format!("Invalid duration '{}'. Examples: 90d, 12weeks", within))?;
    let days = (window.as_secs() / 86_400).max(1);
    match i64::try_from(days).ok().and_then(Duration::try_days) {
        Some(duration) => Ok(duration),
        None => bail!("Window '{}' is too large", within),
    }
}
