use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use super::export;
use crate::error::StudyError;
use crate::models::event::CalendarEvent;
use crate::models::request::TimetableOptions;
use crate::models::timetable::{ics_day_code, RowRejection, TimetableRow};

pub const CALENDAR_FILE_NAME: &str = "smartgrind_timetable.ics";
pub const CALENDAR_MIME: &str = "text/calendar";

/// Outcome of converting a timetable: the file plus any rows left out
#[derive(Debug, Clone)]
pub struct CalendarBuild {
    pub ics: Vec<u8>,
    pub events: Vec<CalendarEvent>,
    pub rejections: Vec<RowRejection>,
}

impl CalendarBuild {
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

/// Service for turning timetable rows into an installable iCalendar file
#[derive(Debug, Clone, Default)]
pub struct ICalendarService {
    timezone: Option<Tz>,
}

impl ICalendarService {
    /// Create a service emitting floating local times
    pub fn new() -> Self {
        Self { timezone: None }
    }

    /// Create a service stamping event times with the given zone
    pub fn with_timezone(timezone: Option<Tz>) -> Self {
        Self { timezone }
    }

    /// Build the calendar for a timetable, stamped with the current time
    pub fn build_calendar(
        &self,
        rows: &[TimetableRow],
        options: &TimetableOptions,
    ) -> Result<CalendarBuild, StudyError> {
        self.build_calendar_at(rows, options, Utc::now())
    }

    /// Build the calendar with an explicit `DTSTAMP`.
    ///
    /// Rows whose start is not strictly before their end are rejected and
    /// reported; the remaining rows still become events. Fails only when no
    /// row survives.
    pub fn build_calendar_at(
        &self,
        rows: &[TimetableRow],
        options: &TimetableOptions,
        stamp: DateTime<Utc>,
    ) -> Result<CalendarBuild, StudyError> {
        options.validate()?;

        let (events, rejections) = self.events_for(rows, options);

        for rejection in &rejections {
            log::warn!("Rejected timetable {}", rejection);
        }

        if events.is_empty() {
            return Err(StudyError::Serialization(rejections));
        }

        let ics = export::multiple(&events, self.timezone, stamp);
        log::info!(
            "Built calendar with {} events ({} rejected)",
            events.len(),
            rejections.len()
        );

        Ok(CalendarBuild {
            ics: ics.into_bytes(),
            events,
            rejections,
        })
    }

    /// Convert rows to events, splitting off the ones that cannot be scheduled
    pub fn events_for(
        &self,
        rows: &[TimetableRow],
        options: &TimetableOptions,
    ) -> (Vec<CalendarEvent>, Vec<RowRejection>) {
        let monday = week_monday(options.week_of);
        let mut events = Vec::with_capacity(rows.len());
        let mut rejections = Vec::new();

        for row in rows {
            if row.start == row.end {
                rejections.push(row.reject("start time equals end time"));
                continue;
            }
            if row.start > row.end {
                rejections.push(row.reject("start time is after end time"));
                continue;
            }

            let date = monday + Duration::days(row.day.num_days_from_monday() as i64);
            let mut builder = CalendarEvent::builder()
                .uid(build_uid(monday, row))
                .subject(row.subject.clone())
                .start(date.and_time(row.start))
                .end(date.and_time(row.end))
                .repeat_weeks(options.repeat_weeks)
                .alarm_minutes(options.alarm_minutes);
            if let Some(location) = &row.location {
                builder = builder.location(location.clone());
            }
            if let Some(notes) = &row.notes {
                builder = builder.description(notes.clone());
            }

            match builder.build() {
                Ok(event) => events.push(event),
                Err(reason) => rejections.push(row.reject(reason)),
            }
        }

        (events, rejections)
    }
}

/// Monday of the week containing `date`
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn build_uid(monday: NaiveDate, row: &TimetableRow) -> String {
    format!(
        "smartgrind-{}-r{}-{}{}@smartgrind",
        monday.format("%Y%m%d"),
        row.row,
        ics_day_code(row.day).to_lowercase(),
        row.start.format("%H%M")
    )
}
