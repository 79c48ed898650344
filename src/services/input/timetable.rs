use std::collections::HashMap;

use super::time::{parse_time_of_day, parse_weekday};
use crate::error::StudyError;
use crate::models::timetable::TimetableRow;

pub const REQUIRED_COLUMNS: [&str; 4] = ["day", "start", "end", "subject"];
pub const OPTIONAL_COLUMNS: [&str; 2] = ["location", "notes"];

const EXAMPLE_HEADER: &str = "Day, Start, End, Subject, Location";

/// Parse a timetable CSV into rows.
///
/// Header names are matched case-insensitively after trimming. A missing
/// required column fails the whole file; an unknown day or unparseable time
/// fails with the offending data row number.
pub fn parse_timetable_csv(content: &[u8]) -> Result<Vec<TimetableRow>, StudyError> {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect();

    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(required) {
            return Err(StudyError::parse(format!(
                "Missing required column: {} (example CSV header: {})",
                required, EXAMPLE_HEADER
            )));
        }
    }

    let index = |name: &str| columns.get(name).copied();
    let (day_idx, start_idx, end_idx, subject_idx) = (
        columns["day"],
        columns["start"],
        columns["end"],
        columns["subject"],
    );
    let location_idx = index("location");
    let notes_idx = index("notes");

    let mut rows = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let record = record?;
        let row = offset + 1;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let field = |idx: usize| record.get(idx).unwrap_or("").trim();
        let optional = |idx: Option<usize>| {
            idx.map(field)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let day_raw = field(day_idx);
        let day = parse_weekday(day_raw)
            .ok_or_else(|| StudyError::parse_at(row, format!("unknown day '{}'", day_raw)))?;

        let start_raw = field(start_idx);
        let start = parse_time_of_day(start_raw).ok_or_else(|| {
            StudyError::parse_at(row, format!("unrecognised start time '{}'", start_raw))
        })?;

        let end_raw = field(end_idx);
        let end = parse_time_of_day(end_raw).ok_or_else(|| {
            StudyError::parse_at(row, format!("unrecognised end time '{}'", end_raw))
        })?;

        let subject = field(subject_idx);
        if subject.is_empty() {
            return Err(StudyError::parse_at(row, "subject is empty"));
        }

        let mut parsed = TimetableRow::new(row, day, start, end, subject);
        parsed.location = optional(location_idx);
        parsed.notes = optional(notes_idx);
        rows.push(parsed);
    }

    log::debug!("Parsed {} timetable rows", rows.len());
    Ok(rows)
}
