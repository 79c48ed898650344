// Property-based tests for timetable to calendar conversion
// Random rows must split cleanly into events and rejections

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use proptest::prelude::*;

use smartgrind::error::StudyError;
use smartgrind::models::request::TimetableOptions;
use smartgrind::models::timetable::TimetableRow;
use smartgrind::services::icalendar::{week_monday, ICalendarService};

const DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn row_strategy() -> impl Strategy<Value = (usize, u32, u32, u32, u32)> {
    (0..7usize, 0..24u32, 0..60u32, 0..24u32, 0..60u32)
}

fn to_rows(raw: &[(usize, u32, u32, u32, u32)]) -> Vec<TimetableRow> {
    raw.iter()
        .enumerate()
        .map(|(idx, &(day, sh, sm, eh, em))| {
            TimetableRow::new(
                idx + 1,
                DAYS[day],
                NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
                NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
                format!("Subject {}", idx + 1),
            )
        })
        .collect()
}

proptest! {
    /// Property: every row becomes exactly one event or one rejection
    #[test]
    fn prop_rows_partition_into_events_and_rejections(
        raw in prop::collection::vec(row_strategy(), 1..30),
        offset in 0..365i64,
        alarm in 0..=1440u32,
    ) {
        let rows = to_rows(&raw);
        let week_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(offset);
        let options = TimetableOptions::new(week_of, alarm);
        let valid = rows.iter().filter(|r| r.start < r.end).count();

        match ICalendarService::new().build_calendar_at(&rows, &options, stamp()) {
            Ok(build) => {
                prop_assert_eq!(build.event_count(), valid);
                prop_assert_eq!(build.event_count() + build.rejections.len(), rows.len());

                let ics = String::from_utf8(build.ics).unwrap();
                prop_assert_eq!(ics.matches("BEGIN:VEVENT").count(), valid);
                prop_assert_eq!(ics.matches("BEGIN:VALARM").count(), valid);
                let trigger = format!("TRIGGER:-PT{}M", alarm);
                prop_assert_eq!(ics.matches(trigger.as_str()).count(), valid);
            }
            Err(StudyError::Serialization(rejections)) => {
                prop_assert_eq!(valid, 0);
                prop_assert_eq!(rejections.len(), rows.len());
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    /// Property: rejections name exactly the rows whose start is not before end
    #[test]
    fn prop_rejections_are_the_non_increasing_rows(
        raw in prop::collection::vec(row_strategy(), 1..30),
    ) {
        let rows = to_rows(&raw);
        let options = TimetableOptions::new(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(), 30);
        let (events, rejections) = ICalendarService::new().events_for(&rows, &options);

        let expected: Vec<usize> = rows.iter().filter(|r| r.start >= r.end).map(|r| r.row).collect();
        let rejected: Vec<usize> = rejections.iter().map(|r| r.row).collect();
        prop_assert_eq!(rejected, expected);

        for event in &events {
            prop_assert!(event.start < event.end);
        }
    }

    /// Property: events land on their row's weekday inside the chosen week
    #[test]
    fn prop_events_fall_in_chosen_week(
        raw in prop::collection::vec(row_strategy(), 1..20),
        offset in 0..730i64,
    ) {
        let rows = to_rows(&raw);
        let week_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset);
        let options = TimetableOptions::new(week_of, 30);
        let monday = week_monday(week_of);
        let (events, _) = ICalendarService::new().events_for(&rows, &options);

        for event in &events {
            let date = event.start.date();
            prop_assert!(date >= monday);
            prop_assert!((date - monday).num_days() < 7);
            prop_assert_eq!(date.weekday(), event.recurrence.day);
        }
    }
}
