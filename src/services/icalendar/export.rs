use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use super::timezone::append_timezone;
use super::utils::{escape_text, format_datetime, format_utc, push_line};
use crate::models::event::CalendarEvent;

pub(super) const PRODID: &str = "-//SmartGrind//Study Timetable//EN";

pub(super) fn multiple(events: &[CalendarEvent], timezone: Option<Tz>, stamp: DateTime<Utc>) -> String {
    let mut ics = String::new();
    append_header(&mut ics, timezone);
    if let Some(tz) = timezone {
        // Every TZID used by an event needs a matching VTIMEZONE
        let year = events
            .iter()
            .map(|event| event.start.year())
            .min()
            .unwrap_or_else(|| stamp.year());
        append_timezone(&mut ics, tz, year);
    }
    for event in events {
        append_event(&mut ics, event, timezone, stamp);
    }
    push_line(&mut ics, "END:VCALENDAR");
    ics
}

fn append_header(buffer: &mut String, timezone: Option<Tz>) {
    push_line(buffer, "BEGIN:VCALENDAR");
    push_line(buffer, "VERSION:2.0");
    push_line(buffer, &format!("PRODID:{}", PRODID));
    push_line(buffer, "CALSCALE:GREGORIAN");
    push_line(buffer, "METHOD:PUBLISH");
    if let Some(tz) = timezone {
        push_line(buffer, &format!("X-WR-TIMEZONE:{}", tz.name()));
    }
}

fn append_event(buffer: &mut String, event: &CalendarEvent, timezone: Option<Tz>, stamp: DateTime<Utc>) {
    push_line(buffer, "BEGIN:VEVENT");
    push_line(buffer, &format!("UID:{}", event.uid));
    push_line(buffer, &format!("DTSTAMP:{}", format_utc(&stamp)));

    let tzid = timezone
        .map(|tz| format!(";TZID={}", tz.name()))
        .unwrap_or_default();
    push_line(
        buffer,
        &format!("DTSTART{}:{}", tzid, format_datetime(&event.start)),
    );
    push_line(buffer, &format!("DTEND{}:{}", tzid, format_datetime(&event.end)));
    push_line(buffer, &format!("RRULE:{}", event.recurrence.to_rrule()));

    push_line(buffer, &format!("SUMMARY:{}", escape_text(&event.subject)));
    if let Some(location) = &event.location {
        push_line(buffer, &format!("LOCATION:{}", escape_text(location)));
    }
    if let Some(desc) = &event.description {
        push_line(buffer, &format!("DESCRIPTION:{}", escape_text(desc)));
    }

    push_line(buffer, "BEGIN:VALARM");
    push_line(buffer, "ACTION:DISPLAY");
    push_line(buffer, &format!("DESCRIPTION:{}", escape_text(&event.alarm_text())));
    push_line(buffer, &format!("TRIGGER:-PT{}M", event.alarm_minutes));
    push_line(buffer, "END:VALARM");

    push_line(buffer, "END:VEVENT");
}
