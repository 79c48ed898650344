//! Error taxonomy for study actions.
//!
//! Every failure a user action can hit is one of these variants. They are
//! caught at the handler boundary and rendered as a message; none of them is
//! fatal to the running server.

use thiserror::Error;

use crate::models::timetable::RowRejection;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StudyError {
    /// Malformed CSV timetable (missing column, unknown day, bad time).
    #[error("Parse error{}: {message}", row_suffix(.row))]
    Parse { row: Option<usize>, message: String },

    /// A document produced no usable text.
    #[error("Read error: {0}")]
    Read(String),

    /// Missing or rejected API credential.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The AI provider failed, timed out or returned an unusable payload.
    #[error("AI service error: {0}")]
    Service(String),

    /// Timetable rows could not be turned into calendar events.
    #[error("Serialization error: {}", describe_rejections(.0))]
    Serialization(Vec<RowRejection>),

    /// Form values outside their accepted range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StudyError {
    pub fn parse(message: impl Into<String>) -> Self {
        StudyError::Parse {
            row: None,
            message: message.into(),
        }
    }

    pub fn parse_at(row: usize, message: impl Into<String>) -> Self {
        StudyError::Parse {
            row: Some(row),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            StudyError::Parse { .. } => "parse_error",
            StudyError::Read(_) => "read_error",
            StudyError::Auth(_) => "auth_error",
            StudyError::Service(_) => "service_error",
            StudyError::Serialization(_) => "serialization_error",
            StudyError::InvalidInput(_) => "invalid_input",
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" (row {})", row),
        None => String::new(),
    }
}

fn describe_rejections(rejections: &[RowRejection]) -> String {
    if rejections.is_empty() {
        return "no timetable rows to convert".to_string();
    }
    rejections
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for StudyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StudyError::Service(format!("request timed out: {}", err))
        } else {
            StudyError::Service(format!("HTTP error: {}", err))
        }
    }
}

impl From<csv::Error> for StudyError {
    fn from(err: csv::Error) -> Self {
        // Record 0 is the header; data records count from 1 like parse errors.
        let row = err
            .position()
            .map(|pos| pos.record() as usize)
            .filter(|&record| record > 0);
        StudyError::Parse {
            row,
            message: format!("invalid CSV: {}", err),
        }
    }
}
