//! Core of eventcal: turns declarative event definitions into iCalendar data.
//!
//! - `definition`: the TOML/JSON definition file format
//! - `event` / `exception`: records resolved from definitions
//! - `compile`: the event compiler producing `CalendarComponent`s
//! - `ics`: RFC 5545 generation and parsing
//! - `recurrence`: RRULE values and occurrence expansion

pub mod compile;
pub mod component;
pub mod date_format;
pub mod definition;
pub mod error;
pub mod event;
pub mod eventcal_config;
pub mod exception;
pub mod ics;
pub mod recurrence;

pub use compile::compile;
pub use component::{CalendarComponent, EventTime};
pub use definition::Definition;
pub use error::{EventCalError, EventCalResult};
pub use event::{EventRecord, EventShape, ShapePolicy};
pub use exception::{ExceptionRecord, ExceptionSet};
pub use recurrence::{Frequency, RecurrenceRule, Terminator};
