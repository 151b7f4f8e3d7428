//! Declarative definition files.
//!
//! A definition file lists `events` and optional `exceptions` as plain data
//! (TOML, or JSON when the file ends in `.json`). Dates and times stay as
//! text here; they are parsed when the records are resolved.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compile::compile;
use crate::component::CalendarComponent;
use crate::error::{EventCalError, EventCalResult};
use crate::event::{EventRecord, ShapePolicy};
use crate::exception::ExceptionRecord;

/// One `[[events]]` entry as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceDefinition>,
}

/// The `recurrence` table of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceDefinition {
    pub freq: String,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

fn default_interval() -> u32 {
    1
}

/// One `[[exceptions]]` entry. `title` and `reason` are documentation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionDefinition {
    pub date_start: String,
    pub date_end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A whole definition file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub events: Vec<EventDefinition>,
    #[serde(default)]
    pub exceptions: Vec<ExceptionDefinition>,
}

impl Definition {
    /// Load a definition file, picking the format from the extension.
    pub fn load(path: &Path) -> EventCalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> EventCalResult<Self> {
        toml::from_str(content).map_err(|e| EventCalError::Definition(e.to_string()))
    }

    pub fn from_json(content: &str) -> EventCalResult<Self> {
        serde_json::from_str(content).map_err(|e| EventCalError::Definition(e.to_string()))
    }

    /// Resolve every record and compile. The first bad record aborts the batch.
    pub fn compile(&self, policy: ShapePolicy) -> EventCalResult<Vec<CalendarComponent>> {
        let events = self
            .events
            .iter()
            .enumerate()
            .map(|(index, def)| EventRecord::resolve(def, index, policy))
            .collect::<EventCalResult<Vec<_>>>()?;

        let exceptions = self
            .exceptions
            .iter()
            .map(ExceptionRecord::resolve)
            .collect::<EventCalResult<Vec<_>>>()?;

        compile(&events, &exceptions)
    }
}
