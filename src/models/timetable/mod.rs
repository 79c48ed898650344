// Timetable module
// One recurring weekly class session parsed from an uploaded CSV

use chrono::{NaiveTime, Weekday};
use serde::Serialize;
use std::fmt;

/// A single class session from a timetable CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRow {
    /// 1-based data row number in the source file (header excluded)
    pub row: usize,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub subject: String,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl TimetableRow {
    pub fn new(
        row: usize,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            row,
            day,
            start,
            end,
            subject: subject.into(),
            location: None,
            notes: None,
        }
    }

    /// Whether the session has a positive duration
    pub fn has_valid_range(&self) -> bool {
        self.start < self.end
    }

    /// Report this row as rejected for the given reason
    pub fn reject(&self, reason: impl Into<String>) -> RowRejection {
        RowRejection {
            row: self.row,
            day: self.day,
            start: self.start,
            end: self.end,
            subject: self.subject.clone(),
            reason: reason.into(),
        }
    }
}

/// A timetable row that could not become a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    pub row: usize,
    #[serde(serialize_with = "serialize_weekday")]
    pub day: Weekday,
    #[serde(serialize_with = "serialize_time")]
    pub start: NaiveTime,
    #[serde(serialize_with = "serialize_time")]
    pub end: NaiveTime,
    pub subject: String,
    pub reason: String,
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} ({} {} {}-{}): {}",
            self.row,
            self.subject,
            self.day,
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.reason
        )
    }
}

/// Two-letter RFC 5545 weekday code (`MO`, `TU`, ...)
pub fn ics_day_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn serialize_weekday<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&day.to_string())
}

fn serialize_time<S: serde::Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&time.format("%H:%M").to_string())
}
