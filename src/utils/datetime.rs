use chrono::NaiveDate;

/// Canonical storage format for event dates.
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d";

// Dotted dates are what older chats were told to type.
const ACCEPTED_DATE_FORMATS: [&str; 2] = [EVENT_DATE_FORMAT, "%Y.%m.%d"];

/// Parses `YYYY-MM-DD` or `YYYY.MM.DD`.
pub fn parse_event_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
}

/// Canonical `YYYY-MM-DD` form.
pub fn format_event_date(date: NaiveDate) -> String {
    date.format(EVENT_DATE_FORMAT).to_string()
}
