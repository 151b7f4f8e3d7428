//! Exception ranges and the set of excepted days.

use std::collections::BTreeSet;
use std::ops::RangeBounds;

use chrono::{Duration, NaiveDate};

use crate::date_format::parse_date;
use crate::definition::ExceptionDefinition;
use crate::error::{EventCalError, EventCalResult};

/// An inclusive range of days on which nothing should happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRecord {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// `title` or `reason` from the definition; never emitted
    pub note: Option<String>,
}

impl ExceptionRecord {
    pub fn resolve(def: &ExceptionDefinition) -> EventCalResult<Self> {
        Ok(ExceptionRecord {
            date_start: parse_date(&def.date_start)?,
            date_end: parse_date(&def.date_end)?,
            note: def.title.clone().or_else(|| def.reason.clone()),
        })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let len = (self.date_end - self.date_start).num_days().max(-1) + 1;
        (0..len).map(move |offset| self.date_start + Duration::days(offset))
    }
}

/// Every excepted day, ordered so range queries come out sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    days: BTreeSet<NaiveDate>,
}

impl ExceptionSet {
    /// Union of all exception ranges. Overlaps are fine.
    pub fn build(exceptions: &[ExceptionRecord]) -> EventCalResult<Self> {
        let mut days = BTreeSet::new();

        for (index, exception) in exceptions.iter().enumerate() {
            if exception.date_end < exception.date_start {
                return Err(EventCalError::InvalidRange {
                    context: format!("exception #{}", index + 1),
                    start: exception.date_start.format("%d.%m.%Y").to_string(),
                    end: exception.date_end.format("%d.%m.%Y").to_string(),
                });
            }
            days.extend(exception.days());
        }

        Ok(ExceptionSet { days })
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.days.contains(date)
    }

    /// Excepted days within `range`, ascending.
    pub fn within<R>(&self, range: R) -> impl Iterator<Item = NaiveDate> + '_
    where
        R: RangeBounds<NaiveDate>,
    {
        self.days.range(range).copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
