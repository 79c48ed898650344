// Request module
// A single user action and its payload; discarded once the result is rendered

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StudyError;
use crate::models::timetable::TimetableRow;

pub const MIN_ROADMAP_WEEKS: u32 = 4;
pub const MAX_ROADMAP_WEEKS: u32 = 52;
pub const DEFAULT_ROADMAP_WEEKS: u32 = 12;
pub const MAX_ALARM_MINUTES: u32 = 1440;
pub const MAX_REPEAT_WEEKS: u32 = 52;

/// The three study features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Summarize,
    ScheduleFromCsv,
    Roadmap,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Summarize => "Summary",
            Mode::ScheduleFromCsv => "Timetable",
            Mode::Roadmap => "Roadmap",
        }
    }
}

/// How the notes summary should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    /// Short bullets for last-minute revision
    #[default]
    Concise,
    /// Plain-language explanation with analogies
    Elaborate,
}

impl SummaryStyle {
    /// Lenient parse of a form value; anything unrecognised is `Concise`
    pub fn from_form(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value.starts_with("elaborate") || value.contains("explain") {
            SummaryStyle::Elaborate
        } else {
            SummaryStyle::Concise
        }
    }
}

/// Inputs for the roadmap generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapOptions {
    pub goal: String,
    #[serde(default)]
    pub background: String,
    #[serde(default = "default_weeks")]
    pub weeks: u32,
}

fn default_weeks() -> u32 {
    DEFAULT_ROADMAP_WEEKS
}

impl RoadmapOptions {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            background: String::new(),
            weeks: DEFAULT_ROADMAP_WEEKS,
        }
    }

    pub fn validate(&self) -> Result<(), StudyError> {
        if self.goal.trim().is_empty() {
            return Err(StudyError::InvalidInput(
                "Please enter a clear goal".to_string(),
            ));
        }
        if !(MIN_ROADMAP_WEEKS..=MAX_ROADMAP_WEEKS).contains(&self.weeks) {
            return Err(StudyError::InvalidInput(format!(
                "Roadmap length must be between {} and {} weeks",
                MIN_ROADMAP_WEEKS, MAX_ROADMAP_WEEKS
            )));
        }
        Ok(())
    }
}

/// Calendar generation settings chosen for one timetable upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableOptions {
    /// Any date inside the first week of classes
    pub week_of: NaiveDate,
    /// Minutes before each class the reminder fires
    pub alarm_minutes: u32,
    /// Number of weekly repetitions; `None` repeats indefinitely
    pub repeat_weeks: Option<u32>,
}

impl TimetableOptions {
    pub fn new(week_of: NaiveDate, alarm_minutes: u32) -> Self {
        Self {
            week_of,
            alarm_minutes,
            repeat_weeks: None,
        }
    }

    pub fn validate(&self) -> Result<(), StudyError> {
        if self.alarm_minutes > MAX_ALARM_MINUTES {
            return Err(StudyError::InvalidInput(format!(
                "Alarm must be between 0 and {} minutes before class",
                MAX_ALARM_MINUTES
            )));
        }
        if let Some(weeks) = self.repeat_weeks {
            if weeks == 0 || weeks > MAX_REPEAT_WEEKS {
                return Err(StudyError::InvalidInput(format!(
                    "Repeat count must be between 1 and {} weeks",
                    MAX_REPEAT_WEEKS
                )));
            }
        }
        Ok(())
    }
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyRequest {
    Summarize {
        notes: String,
        style: SummaryStyle,
    },
    ScheduleFromCsv {
        rows: Vec<TimetableRow>,
        options: TimetableOptions,
    },
    Roadmap(RoadmapOptions),
}

impl StudyRequest {
    pub fn mode(&self) -> Mode {
        match self {
            StudyRequest::Summarize { .. } => Mode::Summarize,
            StudyRequest::ScheduleFromCsv { .. } => Mode::ScheduleFromCsv,
            StudyRequest::Roadmap(_) => Mode::Roadmap,
        }
    }
}
