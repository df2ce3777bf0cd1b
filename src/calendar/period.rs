use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

use super::access::can_view;
use super::error::CalendarError;
use super::event::{ActorId, Event};

/// Time window offered by the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Rolling seven days after today; today itself has already begun.
    Week,
    /// The current calendar month.
    #[default]
    Month,
    /// The current calendar year.
    Year,
}

impl Period {
    /// Every period, in the order the view offers them.
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Year];

    /// Token form used in `period_<name>` menu tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "📆 Week",
            Period::Month => "🗓 Month",
            Period::Year => "📅 Year",
        }
    }

    /// Whether an event dated `date` falls in this period as seen on `today`.
    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        match self {
            Period::Week => today < date && date <= today + Duration::days(7),
            Period::Month => date.year() == today.year() && date.month() == today.month(),
            Period::Year => date.year() == today.year(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(CalendarError::Validation(format!("unknown period '{other}'"))),
        }
    }
}

/// Events the viewer may see within `period`, sorted by date.
///
/// Rows whose date does not parse are skipped. Equal dates keep the order of
/// `events`, which repositories return in insertion order.
pub fn filter_events<'a>(
    events: &'a [Event],
    period: Period,
    today: NaiveDate,
    viewer: &ActorId,
    viewer_is_moderator: bool,
) -> Vec<&'a Event> {
    let mut visible: Vec<(NaiveDate, &Event)> = events
        .iter()
        .filter_map(|event| event.parsed_date().map(|date| (date, event)))
        .filter(|(_, event)| can_view(event, viewer, viewer_is_moderator))
        .filter(|(date, _)| period.contains(today, *date))
        .collect();

    visible.sort_by_key(|(date, _)| *date);
    visible.into_iter().map(|(_, event)| event).collect()
}
