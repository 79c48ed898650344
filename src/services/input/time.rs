use chrono::{NaiveTime, Weekday};

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M%p", "%I:%M:%S%p"];

/// Parse a time of day such as `09:00`, `9:00:00`, `2:30PM`, `2:30 pm` or `2PM`.
pub fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    let mut value: String = input
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if value.is_empty() {
        return None;
    }

    // Hour-only 12h values ("2PM") need minutes for chrono.
    let has_meridiem = value.ends_with("AM") || value.ends_with("PM");
    if has_meridiem && !value.contains(':') {
        let split = value.len() - 2;
        value.insert_str(split, ":00");
    }

    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&value, format).ok())
}

/// Parse an English weekday name or three-letter abbreviation, any case.
pub fn parse_weekday(input: &str) -> Option<Weekday> {
    input.trim().parse::<Weekday>().ok()
}
