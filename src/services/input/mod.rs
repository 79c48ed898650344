//! Input adapter: turns pasted text, uploaded documents and timetable CSVs
//! into plain strings or [`TimetableRow`](crate::models::timetable::TimetableRow)s.

mod document;
mod time;
mod timetable;

pub use document::{extract_document_text, DocumentKind};
pub use time::{parse_time_of_day, parse_weekday};
pub use timetable::{parse_timetable_csv, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};

use crate::error::StudyError;

/// Normalize pasted notes: unify line endings and trim surrounding whitespace.
pub fn normalize_text(text: &str) -> Result<String, StudyError> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return Err(StudyError::Read(
            "Please paste your notes or upload a file first.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim lines and drop blank ones, as extracted document text is noisy.
pub(crate) fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
