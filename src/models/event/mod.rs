// Event module
// Calendar event derived 1:1 from a timetable row

use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::models::timetable::ics_day_code;

/// Weekly repetition on a fixed weekday (RFC 5545 `FREQ=WEEKLY`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyRecurrence {
    pub day: Weekday,
    /// Total occurrences; `None` repeats without end
    pub count: Option<u32>,
}

impl WeeklyRecurrence {
    /// Render as an RRULE value, e.g. `FREQ=WEEKLY;BYDAY=MO;COUNT=12`
    pub fn to_rrule(&self) -> String {
        let mut rule = format!("FREQ=WEEKLY;BYDAY={}", ics_day_code(self.day));
        if let Some(count) = self.count {
            rule.push_str(&format!(";COUNT={}", count));
        }
        rule
    }
}

/// A recurring class session with a reminder, ready to serialize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub subject: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// First occurrence, floating local time
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub recurrence: WeeklyRecurrence,
    /// Minutes before `start` the display alarm fires
    pub alarm_minutes: u32,
}

impl CalendarEvent {
    /// Create a builder for constructing events with optional fields
    pub fn builder() -> CalendarEventBuilder {
        CalendarEventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() {
            return Err("Event subject cannot be empty".to_string());
        }

        if self.end <= self.start {
            return Err("start time must be before end time".to_string());
        }

        if self.start.weekday() != self.recurrence.day {
            return Err(format!(
                "first occurrence falls on {} but the event repeats on {}",
                self.start.weekday(),
                self.recurrence.day
            ));
        }

        Ok(())
    }

    pub fn alarm_text(&self) -> String {
        format!("Reminder: {}", self.subject)
    }
}

/// Builder for creating events with optional fields
pub struct CalendarEventBuilder {
    uid: Option<String>,
    subject: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    repeat_weeks: Option<u32>,
    alarm_minutes: u32,
}

impl CalendarEventBuilder {
    pub fn new() -> Self {
        Self {
            uid: None,
            subject: None,
            description: None,
            location: None,
            start: None,
            end: None,
            repeat_weeks: None,
            alarm_minutes: 30,
        }
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Limit the number of weekly occurrences
    pub fn repeat_weeks(mut self, weeks: Option<u32>) -> Self {
        self.repeat_weeks = weeks;
        self
    }

    pub fn alarm_minutes(mut self, minutes: u32) -> Self {
        self.alarm_minutes = minutes;
        self
    }

    /// Build the event; the weekday of `start` becomes the recurrence day
    pub fn build(self) -> Result<CalendarEvent, String> {
        let subject = self.subject.ok_or("Event subject is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;
        let uid = self.uid.ok_or("Event UID is required")?;

        let event = CalendarEvent {
            uid,
            subject,
            description: self.description,
            location: self.location,
            start,
            end,
            recurrence: WeeklyRecurrence {
                day: start.weekday(),
                count: self.repeat_weeks,
            },
            alarm_minutes: self.alarm_minutes,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for CalendarEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
