// Unit tests for timetable time and weekday parsing

use chrono::{NaiveTime, Weekday};
use test_case::test_case;

use smartgrind::services::input::{parse_time_of_day, parse_weekday};

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test_case("09:00", 9, 0 ; "24h with leading zero")]
#[test_case("9:00", 9, 0 ; "24h without leading zero")]
#[test_case("17:45", 17, 45 ; "afternoon 24h")]
#[test_case("08:30:00", 8, 30 ; "24h with seconds")]
#[test_case("2:30PM", 14, 30 ; "12h compact")]
#[test_case("2:30 pm", 14, 30 ; "12h lowercase spaced")]
#[test_case("12:00 PM", 12, 0 ; "noon")]
#[test_case("12:15 am", 0, 15 ; "just after midnight")]
#[test_case("2PM", 14, 0 ; "hour only")]
#[test_case(" 11 AM ", 11, 0 ; "hour only padded")]
fn test_parses_time(input: &str, hour: u32, minute: u32) {
    assert_eq!(parse_time_of_day(input), Some(hm(hour, minute)));
}

#[test_case("" ; "empty")]
#[test_case("noon" ; "word")]
#[test_case("25:00" ; "hour out of range")]
#[test_case("10:75" ; "minute out of range")]
#[test_case("13PM" ; "invalid 12h hour")]
fn test_rejects_time(input: &str) {
    assert_eq!(parse_time_of_day(input), None);
}

#[test_case("Mon", Weekday::Mon ; "abbreviation")]
#[test_case("monday", Weekday::Mon ; "lowercase full name")]
#[test_case("TUESDAY", Weekday::Tue ; "uppercase full name")]
#[test_case(" Wed ", Weekday::Wed ; "padded")]
#[test_case("thu", Weekday::Thu ; "lowercase abbreviation")]
#[test_case("Friday", Weekday::Fri ; "friday")]
#[test_case("Sat", Weekday::Sat ; "saturday")]
#[test_case("Sunday", Weekday::Sun ; "sunday")]
fn test_parses_weekday(input: &str, expected: Weekday) {
    assert_eq!(parse_weekday(input), Some(expected));
}

#[test_case("Funday" ; "made up")]
#[test_case("" ; "empty")]
#[test_case("M" ; "single letter")]
fn test_rejects_weekday(input: &str) {
    assert_eq!(parse_weekday(input), None);
}
