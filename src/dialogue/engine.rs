use chrono::{Local, NaiveDate};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::calendar::{
    authorize_modify, can_modify, can_view, filter_events, ActorId, CalendarError,
    CalendarResult, Comment, ErrorKind, Event, EventId, EventPatch, NewEvent, Period, Visibility,
};
use crate::database::{EventRepository, ModeratorRegistry};
use crate::dialogue::action::{Action, ActionKind, Actor};
use crate::dialogue::menu::MenuChoice;
use crate::dialogue::response::{Choice, FeedbackType, Response};
use crate::dialogue::session::{DialogueState, Session, SessionStore};
use crate::utils::datetime::format_event_date;
use crate::utils::logging::{
    log_action_error, log_action_start, log_action_success, log_permission_denied, log_timeout,
    log_validation_error,
};
use crate::utils::validation::{
    is_affirmative, parse_event_input, validate_actor_id, validate_comment,
};

/// Upper bound on a single repository or registry call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// What to show and which session to commit once a step succeeds.
struct Step {
    response: Response,
    next: Session,
}

impl Step {
    fn new(response: Response, next: Session) -> Self {
        Self { response, next }
    }
}

/// Bookkeeping for one turn.
#[derive(Default)]
struct Turn {
    /// A store mutation has been committed during this turn.
    mutated: bool,
}

/// Drives every actor's dialogue.
///
/// A turn holds the actor's session for its whole duration, so turns of one
/// actor never overlap. Every store call is bounded by the store timeout,
/// which keeps that hold finite. Session changes are applied only when the
/// turn finishes.
pub struct DialogueEngine {
    events: Arc<dyn EventRepository>,
    moderators: Arc<dyn ModeratorRegistry>,
    sessions: SessionStore,
    today: Clock,
    store_timeout: Duration,
}

impl DialogueEngine {
    /// Engine over the given stores, with the local clock and the default store timeout.
    pub fn new(events: Arc<dyn EventRepository>, moderators: Arc<dyn ModeratorRegistry>) -> Self {
        Self {
            events,
            moderators,
            sessions: SessionStore::new(),
            today: Arc::new(|| Local::now().date_naive()),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Overrides the bound on each store call.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Replaces the local-date clock used by calendar views.
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    /// Copy of the actor's current session.
    pub async fn session(&self, actor: &ActorId) -> Session {
        self.sessions.snapshot(actor).await
    }

    /// Number of actors seen since startup.
    pub async fn active_sessions(&self) -> usize {
        self.sessions.len().await
    }

    /// Runs one dialogue turn.
    ///
    /// Validation, permission and not-found failures come back as an `Ok`
    /// response with `error` set, and the session returns to idle. Storage
    /// failures are returned as `Err`; the session is kept unless this turn
    /// committed a mutation or a write timed out and may still land.
    pub async fn handle(&self, action: Action) -> CalendarResult<Response> {
        let actor_label = action.actor.id.to_string();
        let action_name = action.describe();
        log_action_start(&action_name, &actor_label, None);

        let mut session = self.sessions.begin_turn(&action.actor.id).await;
        let mut turn = Turn::default();

        match self.step(&session, &action, &mut turn).await {
            Ok(step) => {
                *session = step.next;
                Ok(step.response)
            }
            Err(err) if err.is_recoverable() => {
                match err.kind() {
                    ErrorKind::Validation => log_validation_error(
                        &action_name,
                        action.payload(),
                        &err.to_string(),
                        &actor_label,
                    ),
                    ErrorKind::Permission => {
                        let target = session
                            .selected_event_id
                            .map(|id| id.to_string())
                            .unwrap_or_else(|| action.payload().to_string());
                        log_permission_denied(&action_name, &actor_label, &target)
                    }
                    _ => tracing::info!("{} by {} ended: {}", action_name, actor_label, err),
                }
                *session = Session::idle();
                let menu = self.main_menu(&action.actor.id).await;
                Ok(Response::from_error(&err).with_choices(menu))
            }
            Err(err) => {
                log_action_error(&action_name, &actor_label, &err.to_string());
                if turn.mutated {
                    *session = Session::idle();
                }
                Err(err)
            }
        }
    }

    async fn step(&self, session: &Session, action: &Action, turn: &mut Turn) -> CalendarResult<Step> {
        let actor = &action.actor;
        match &action.kind {
            ActionKind::Cancel => {
                let response = Response::feedback(FeedbackType::Info, "Action cancelled.")
                    .with_choices(self.main_menu(&actor.id).await);
                Ok(Step::new(response, Session::idle()))
            }
            ActionKind::MenuSelect(token) => {
                let choice = token.parse::<MenuChoice>()?;
                self.on_menu(session, actor, choice).await
            }
            ActionKind::TextInput(text) => match session.state {
                DialogueState::Idle => {
                    let response = Response::feedback(FeedbackType::Info, "Choose an action:")
                        .with_choices(self.main_menu(&actor.id).await);
                    Ok(Step::new(response, session.clone()))
                }
                DialogueState::AwaitingEventInput => self.commit_create(session, actor, text, turn).await,
                DialogueState::AwaitingComment => self.commit_comment(session, actor, text, turn).await,
                DialogueState::AwaitingEditInput => self.commit_edit(session, actor, text, turn).await,
                DialogueState::AwaitingRemovalConfirmation => {
                    self.commit_removal(session, actor, text, turn).await
                }
                DialogueState::AwaitingPromotionTarget => {
                    self.commit_promotion(actor, text, turn).await
                }
            },
        }
    }

    async fn on_menu(&self, session: &Session, actor: &Actor, choice: MenuChoice) -> CalendarResult<Step> {
        match choice {
            MenuChoice::MainMenu => {
                let response = Response::new("Choose an action:")
                    .with_choices(self.main_menu(&actor.id).await);
                Ok(Step::new(response, Session::idle()))
            }
            MenuChoice::ViewCalendar => self.calendar_view(actor, Period::default()).await,
            MenuChoice::Period(period) => self.calendar_view(actor, period).await,
            MenuChoice::AddEvent => {
                let response = Response::new("Who will see the event?")
                    .with_choice("🌍 Event for everyone", MenuChoice::Visibility(Visibility::Public))
                    .with_choice("👤 Event for me", MenuChoice::Visibility(Visibility::Private))
                    .with_choice("🔁 Main menu", MenuChoice::MainMenu);
                Ok(Step::new(response, Session::idle()))
            }
            MenuChoice::Visibility(visibility) => {
                let response = Response::feedback(
                    FeedbackType::Prompt,
                    "Enter the date (YYYY-MM-DD) and the event title, e.g. 2025-06-01 Team sync",
                )
                .with_choice("🔁 Main menu", MenuChoice::MainMenu);
                let next = Session {
                    pending_visibility: Some(visibility),
                    ..Session::idle()
                }
                .awaiting(DialogueState::AwaitingEventInput);
                Ok(Step::new(response, next))
            }
            MenuChoice::Select(id) => self.detail_view(actor, id).await,
            MenuChoice::Comment => {
                let id = selected_event(session)?;
                let event = self.visible_event(actor, &id).await?;
                let response = Response::feedback(
                    FeedbackType::Prompt,
                    &format!("Enter your comment on '{}':", event.title),
                )
                .with_choice("🔁 Main menu", MenuChoice::MainMenu);
                Ok(Step::new(response, Session::selected(id).awaiting(DialogueState::AwaitingComment)))
            }
            MenuChoice::Edit => {
                let id = selected_event(session)?;
                let event = self.modifiable_event(actor, &id).await?;
                let response = Response::feedback(
                    FeedbackType::Prompt,
                    &format!(
                        "Enter the new date (YYYY-MM-DD) and title for '{}' ({}):",
                        event.title, event.date
                    ),
                )
                .with_choice("🔁 Main menu", MenuChoice::MainMenu);
                Ok(Step::new(response, Session::selected(id).awaiting(DialogueState::AwaitingEditInput)))
            }
            MenuChoice::Remove => {
                let id = selected_event(session)?;
                let event = self.modifiable_event(actor, &id).await?;
                let response = Response::feedback(
                    FeedbackType::Warning,
                    &format!(
                        "Remove '{}' on {}? Type 'да' or 'yes' to confirm.",
                        event.title, event.date
                    ),
                )
                .with_choice("🔁 Main menu", MenuChoice::MainMenu);
                Ok(Step::new(
                    response,
                    Session::selected(id).awaiting(DialogueState::AwaitingRemovalConfirmation),
                ))
            }
            MenuChoice::Promote => {
                if !self.is_moderator(&actor.id).await? {
                    return Err(CalendarError::Permission(
                        "only moderators can promote other users".to_string(),
                    ));
                }
                let response = Response::feedback(
                    FeedbackType::Prompt,
                    "Enter the user id to promote to moderator:",
                )
                .with_choice("🔁 Main menu", MenuChoice::MainMenu);
                Ok(Step::new(response, Session::idle().awaiting(DialogueState::AwaitingPromotionTarget)))
            }
        }
    }

    async fn calendar_view(&self, actor: &Actor, period: Period) -> CalendarResult<Step> {
        let events = self.guarded("list events", self.events.list()).await?;
        let is_moderator = self.is_moderator(&actor.id).await?;
        let today = (self.today)();

        let visible = filter_events(&events, period, today, &actor.id, is_moderator);
        let heading = period_heading(period);
        let text = if visible.is_empty() {
            format!("🗓️ No events {heading}.")
        } else {
            format!("🗓️ Events {heading}:")
        };

        let response = Response::new(text)
            .with_choices(
                visible
                    .iter()
                    .map(|event| Choice::new(event.summary(), MenuChoice::Select(event.id))),
            )
            .with_choices(
                Period::ALL
                    .iter()
                    .map(|period| Choice::new(period.label(), MenuChoice::Period(*period))),
            )
            .with_choice("🔁 Main menu", MenuChoice::MainMenu);

        Ok(Step::new(response, Session::idle()))
    }

    async fn detail_view(&self, actor: &Actor, id: EventId) -> CalendarResult<Step> {
        let event = self.guarded("get event", self.events.get(&id)).await?;
        let is_moderator = self.is_moderator(&actor.id).await?;
        if !can_view(&event, &actor.id, is_moderator) {
            return Err(CalendarError::NotFound(format!("event {id}")));
        }

        let modifiable = can_modify(&event, &actor.id, is_moderator);
        let mut response = Response::new(render_event(&event));
        if modifiable {
            response = response.with_choice("✏️ Edit", MenuChoice::Edit);
        }
        response = response.with_choice("💬 Comment", MenuChoice::Comment);
        if modifiable {
            response = response.with_choice("🗑 Remove", MenuChoice::Remove);
        }
        response = response.with_choice("🔁 Main menu", MenuChoice::MainMenu);

        Ok(Step::new(response, Session::selected(id)))
    }

    async fn commit_create(
        &self,
        session: &Session,
        actor: &Actor,
        text: &str,
        turn: &mut Turn,
    ) -> CalendarResult<Step> {
        let (date, title) = parse_event_input(text)?;
        let date = format_event_date(date);
        let visibility = session.pending_visibility.unwrap_or(Visibility::Public);

        let new_event = NewEvent {
            owner: actor.id.clone(),
            owner_name: actor.display_name.clone(),
            title: title.clone(),
            date: date.clone(),
            visibility,
        };
        let id = self
            .guarded_write("create event", turn, self.events.create(new_event))
            .await?;
        log_action_success("create event", actor.id.as_str(), Some(&id.to_string()));

        let response = Response::feedback(
            FeedbackType::Success,
            &format!("Added: {} {date} — {title}", visibility.marker()),
        )
        .with_choices(self.main_menu(&actor.id).await);
        Ok(Step::new(response, Session::idle()))
    }

    async fn commit_comment(
        &self,
        session: &Session,
        actor: &Actor,
        text: &str,
        turn: &mut Turn,
    ) -> CalendarResult<Step> {
        let id = selected_event(session)?;
        let text = validate_comment(text)?;
        self.visible_event(actor, &id).await?;

        let comment = Comment {
            author: actor.id.clone(),
            author_name: actor.display_name.clone(),
            text,
        };
        self.guarded_write(
            "comment on event",
            turn,
            self.events.update(&id, EventPatch::comment(comment)),
        )
        .await?;
        log_action_success("comment", actor.id.as_str(), Some(&id.to_string()));

        let response = Response::feedback(FeedbackType::Success, "Comment added.")
            .with_choices(self.main_menu(&actor.id).await);
        Ok(Step::new(response, Session::idle()))
    }

    async fn commit_edit(
        &self,
        session: &Session,
        actor: &Actor,
        text: &str,
        turn: &mut Turn,
    ) -> CalendarResult<Step> {
        let id = selected_event(session)?;
        let (date, title) = parse_event_input(text)?;
        self.modifiable_event(actor, &id).await?;

        let patch = EventPatch::reschedule(format_event_date(date), title);
        let updated = self
            .guarded_write("update event", turn, self.events.update(&id, patch))
            .await?;
        log_action_success("edit event", actor.id.as_str(), Some(&id.to_string()));

        let response = Response::feedback(
            FeedbackType::Success,
            &format!("Updated: {} — {}", updated.date, updated.title),
        )
        .with_choices(self.main_menu(&actor.id).await);
        Ok(Step::new(response, Session::idle()))
    }

    async fn commit_removal(
        &self,
        session: &Session,
        actor: &Actor,
        text: &str,
        turn: &mut Turn,
    ) -> CalendarResult<Step> {
        if !is_affirmative(text) {
            let response = Response::feedback(FeedbackType::Info, "Removal cancelled.")
                .with_choices(self.main_menu(&actor.id).await);
            return Ok(Step::new(response, Session::idle()));
        }

        let id = selected_event(session)?;
        let event = self.modifiable_event(actor, &id).await?;
        self.guarded_write("delete event", turn, self.events.delete(&id)).await?;
        log_action_success("remove event", actor.id.as_str(), Some(&id.to_string()));

        let response = Response::feedback(
            FeedbackType::Success,
            &format!("Removed: {} — {}", event.date, event.title),
        )
        .with_choices(self.main_menu(&actor.id).await);
        Ok(Step::new(response, Session::idle()))
    }

    async fn commit_promotion(&self, actor: &Actor, text: &str, turn: &mut Turn) -> CalendarResult<Step> {
        let target = validate_actor_id(text)?;
        if !self.is_moderator(&actor.id).await? {
            return Err(CalendarError::Permission(
                "only moderators can promote other users".to_string(),
            ));
        }

        let added = self
            .guarded_write("promote moderator", turn, self.moderators.promote(&target))
            .await?;

        let message = if added {
            log_action_success("promote", actor.id.as_str(), Some(target.as_str()));
            format!("{target} is now a moderator.")
        } else {
            format!("{target} is already a moderator.")
        };
        let response = Response::feedback(FeedbackType::Success, &message)
            .with_choices(self.main_menu(&actor.id).await);
        Ok(Step::new(response, Session::idle()))
    }

    /// Loads an event the actor may see; hidden events read as missing.
    async fn visible_event(&self, actor: &Actor, id: &EventId) -> CalendarResult<Event> {
        let event = self.guarded("get event", self.events.get(id)).await?;
        // Public and owned events need no registry lookup.
        if can_view(&event, &actor.id, false) {
            return Ok(event);
        }
        if can_view(&event, &actor.id, self.is_moderator(&actor.id).await?) {
            return Ok(event);
        }
        Err(CalendarError::NotFound(format!("event {id}")))
    }

    /// Loads an event and re-checks that the actor may change it.
    async fn modifiable_event(&self, actor: &Actor, id: &EventId) -> CalendarResult<Event> {
        let event = self.visible_event(actor, id).await?;
        self.guarded(
            "authorize",
            authorize_modify(&event, &actor.id, self.moderators.as_ref()),
        )
        .await?;
        Ok(event)
    }

    async fn is_moderator(&self, actor: &ActorId) -> CalendarResult<bool> {
        self.guarded("check moderator", self.moderators.is_moderator(actor))
            .await
    }

    async fn main_menu(&self, actor: &ActorId) -> Vec<Choice> {
        let mut choices = vec![
            Choice::new("📅 View calendar", MenuChoice::ViewCalendar),
            Choice::new("➕ Add event", MenuChoice::AddEvent),
        ];
        match self.is_moderator(actor).await {
            Ok(true) => choices.push(Choice::new("🛡 Promote moderator", MenuChoice::Promote)),
            Ok(false) => {}
            Err(e) => tracing::warn!("Could not resolve moderator status for {}: {}", actor, e),
        }
        choices
    }

    /// Like [`Self::guarded`] for calls that change the store.
    ///
    /// A timed-out write may still land after the caller gives up, so it is
    /// recorded on the turn as a mutation.
    async fn guarded_write<T, F>(
        &self,
        operation: &str,
        turn: &mut Turn,
        call: F,
    ) -> CalendarResult<T>
    where
        F: Future<Output = CalendarResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => {
                turn.mutated |= result.is_ok();
                result
            }
            Err(_) => {
                turn.mutated = true;
                log_timeout(operation, self.store_timeout.as_secs(), None);
                Err(CalendarError::Storage(format!("{operation} timed out")))
            }
        }
    }

    async fn guarded<T, F>(&self, operation: &str, call: F) -> CalendarResult<T>
    where
        F: Future<Output = CalendarResult<T>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                log_timeout(operation, self.store_timeout.as_secs(), None);
                Err(CalendarError::Storage(format!("{operation} timed out")))
            }
        }
    }
}

fn selected_event(session: &Session) -> CalendarResult<EventId> {
    session
        .selected_event_id
        .ok_or_else(|| CalendarError::Validation("select an event first".to_string()))
}

fn period_heading(period: Period) -> &'static str {
    match period {
        Period::Week => "in the next 7 days",
        Period::Month => "this month",
        Period::Year => "this year",
    }
}

fn render_event(event: &Event) -> String {
    let mut text = format!(
        "{} {}\n{} ({})",
        event.visibility.marker(),
        event.date,
        event.title,
        event.owner_name
    );
    if !event.comments.is_empty() {
        text.push_str("\n💬 Comments:");
        for comment in &event.comments {
            text.push_str(&format!("\n- {}: {}", comment.author_name, comment.text));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event_with_comments(comments: Vec<Comment>) -> Event {
        Event {
            id: EventId::generate(),
            owner: ActorId::new("1"),
            owner_name: "Alice".to_string(),
            title: "Sync".to_string(),
            date: "2025-06-01".to_string(),
            visibility: Visibility::Private,
            comments,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_event_without_comments() {
        let event = event_with_comments(Vec::new());
        assert_eq!(render_event(&event), "🟣 2025-06-01\nSync (Alice)");
    }

    #[test]
    fn test_render_event_lists_comments_in_order() {
        let event = event_with_comments(vec![
            Comment {
                author: ActorId::new("2"),
                author_name: "Bob".to_string(),
                text: "I'll be late".to_string(),
            },
            Comment {
                author: ActorId::new("1"),
                author_name: "Alice".to_string(),
                text: "ok".to_string(),
            },
        ]);
        assert_eq!(
            render_event(&event),
            "🟣 2025-06-01\nSync (Alice)\n💬 Comments:\n- Bob: I'll be late\n- Alice: ok"
        );
    }

    #[test]
    fn test_selected_event_required() {
        let err = selected_event(&Session::idle()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
