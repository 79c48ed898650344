use chrono::{DateTime, Datelike, Duration, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use super::utils::{format_datetime, push_line};
use crate::models::timetable::ics_day_code;

/// Scan step used to pin down an offset change inside a day
const SCAN_STEP_MINUTES: i64 = 15;

/// One UTC offset change within a year
#[derive(Debug, Clone, PartialEq, Eq)]
struct Transition {
    /// Instant of the change
    at: DateTime<Utc>,
    from_secs: i32,
    to_secs: i32,
}

impl Transition {
    /// Wall-clock time of the change, expressed in the offset in force before it
    fn local_start(&self) -> chrono::NaiveDateTime {
        self.at.naive_utc() + Duration::seconds(self.from_secs as i64)
    }

    fn is_daylight(&self) -> bool {
        self.to_secs > self.from_secs
    }

    /// Yearly rule reproducing this change, e.g. `FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU`
    fn yearly_rule(&self) -> String {
        let date = self.local_start().date();
        let ordinal = if (date + Duration::days(7)).month() != date.month() {
            "-1".to_string()
        } else {
            ((date.day() - 1) / 7 + 1).to_string()
        };
        format!(
            "FREQ=YEARLY;BYMONTH={};BYDAY={}{}",
            date.month(),
            ordinal,
            ics_day_code(date.weekday())
        )
    }
}

fn offset_secs(tz: Tz, at: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc()
}

fn format_offset(secs: i32) -> String {
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    format!("{}{:02}{:02}", sign, secs / 3600, (secs % 3600) / 60)
}

/// Offset changes of `tz` during `year`, in order
fn transitions(tz: Tz, year: i32) -> Vec<Transition> {
    let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    let mut day = Utc.from_utc_datetime(&first.and_time(chrono::NaiveTime::MIN));

    while day.year() == year {
        let next = day + Duration::days(1);
        let from_secs = offset_secs(tz, day);
        if offset_secs(tz, next) != from_secs {
            let mut at = day;
            while at < next && offset_secs(tz, at) == from_secs {
                at += Duration::minutes(SCAN_STEP_MINUTES);
            }
            found.push(Transition {
                at,
                from_secs,
                to_secs: offset_secs(tz, at),
            });
        }
        day = next;
    }

    found
}

/// Append a `VTIMEZONE` describing `tz` as observed in `year`.
///
/// Zones without daylight saving get a single `STANDARD` block. Otherwise
/// each change becomes a `STANDARD` or `DAYLIGHT` block with a yearly rule.
pub(super) fn append_timezone(buffer: &mut String, tz: Tz, year: i32) {
    push_line(buffer, "BEGIN:VTIMEZONE");
    push_line(buffer, &format!("TZID:{}", tz.name()));

    let changes = transitions(tz, year);
    if changes.is_empty() {
        let fixed = NaiveDate::from_ymd_opt(year, 7, 1)
            .map(|date| Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
            .map(|at| offset_secs(tz, at))
            .unwrap_or(0);
        push_line(buffer, "BEGIN:STANDARD");
        push_line(buffer, "DTSTART:19700101T000000");
        push_line(buffer, &format!("TZOFFSETFROM:{}", format_offset(fixed)));
        push_line(buffer, &format!("TZOFFSETTO:{}", format_offset(fixed)));
        push_line(buffer, "END:STANDARD");
    } else {
        for change in &changes {
            let kind = if change.is_daylight() { "DAYLIGHT" } else { "STANDARD" };
            push_line(buffer, &format!("BEGIN:{}", kind));
            push_line(
                buffer,
                &format!("DTSTART:{}", format_datetime(&change.local_start())),
            );
            push_line(buffer, &format!("RRULE:{}", change.yearly_rule()));
            push_line(
                buffer,
                &format!("TZOFFSETFROM:{}", format_offset(change.from_secs)),
            );
            push_line(buffer, &format!("TZOFFSETTO:{}", format_offset(change.to_secs)));
            push_line(buffer, &format!("END:{}", kind));
        }
    }

    push_line(buffer, "END:VTIMEZONE");
}
