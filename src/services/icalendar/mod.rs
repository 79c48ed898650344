//! RFC 5545 (.ics) export of weekly timetable events.

mod export;
mod service;
mod timezone;
mod utils;

pub use service::{week_monday, CalendarBuild, ICalendarService, CALENDAR_FILE_NAME, CALENDAR_MIME};
