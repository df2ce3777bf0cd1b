use std::fmt;
use std::str::FromStr;

use crate::calendar::{CalendarError, EventId, Period, Visibility};

/// Menu tokens understood by the engine.
///
/// The string form travels through the transport as button callback data,
/// so it must stay within Telegram's 64-byte limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Back to the main menu.
    MainMenu,
    /// Calendar for the default period.
    ViewCalendar,
    /// Start adding an event.
    AddEvent,
    /// Visibility of the event being added.
    Visibility(Visibility),
    /// Calendar for a given period.
    Period(Period),
    /// Open an event's detail view.
    Select(EventId),
    /// Comment on the selected event.
    Comment,
    /// Edit the selected event.
    Edit,
    /// Remove the selected event.
    Remove,
    /// Promote another actor to moderator.
    Promote,
}

const SELECT_PREFIX: &str = "select_";
const PERIOD_PREFIX: &str = "period_";

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::MainMenu => f.write_str("back_to_main"),
            MenuChoice::ViewCalendar => f.write_str("view_calendar"),
            MenuChoice::AddEvent => f.write_str("event_menu"),
            MenuChoice::Visibility(visibility) => write!(f, "{}_event", visibility.as_str()),
            MenuChoice::Period(period) => write!(f, "{PERIOD_PREFIX}{period}"),
            MenuChoice::Select(id) => write!(f, "{SELECT_PREFIX}{id}"),
            MenuChoice::Comment => f.write_str("comment_event"),
            MenuChoice::Edit => f.write_str("edit_event"),
            MenuChoice::Remove => f.write_str("remove_event"),
            MenuChoice::Promote => f.write_str("promote"),
        }
    }
}

impl FromStr for MenuChoice {
    type Err = CalendarError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let choice = match token {
            "back_to_main" => MenuChoice::MainMenu,
            "view_calendar" => MenuChoice::ViewCalendar,
            "event_menu" => MenuChoice::AddEvent,
            "public_event" => MenuChoice::Visibility(Visibility::Public),
            "private_event" => MenuChoice::Visibility(Visibility::Private),
            "comment_event" => MenuChoice::Comment,
            "edit_event" => MenuChoice::Edit,
            "remove_event" => MenuChoice::Remove,
            "promote" => MenuChoice::Promote,
            other => {
                if let Some(period) = other.strip_prefix(PERIOD_PREFIX) {
                    MenuChoice::Period(period.parse()?)
                } else if let Some(id) = other.strip_prefix(SELECT_PREFIX) {
                    MenuChoice::Select(id.parse()?)
                } else {
                    return Err(CalendarError::Validation(format!("unknown menu option '{other}'")));
                }
            }
        };
        Ok(choice)
    }
}
