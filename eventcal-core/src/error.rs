//! Error types for eventcal.

use thiserror::Error;

/// Errors that can occur while loading, compiling or serializing events.
#[derive(Error, Debug)]
pub enum EventCalError {
    #[error("Invalid {kind} '{value}': expected {pattern}")]
    DateParse {
        kind: &'static str,
        value: String,
        pattern: &'static str,
    },

    #[error("Invalid range in {context}: {end} is before {start}")]
    InvalidRange {
        context: String,
        start: String,
        end: String,
    },

    #[error("Missing field '{field}' in {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },

    #[error("Ambiguous event shape in {context}: found {shapes}")]
    AmbiguousShape { context: String, shapes: String },

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Definition error: {0}")]
    Definition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for eventcal operations.
pub type EventCalResult<T> = Result<T, EventCalError>;
