use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use std::collections::HashMap;

use crate::calendar::{
    ActorId, CalendarError, CalendarResult, Comment, Event, EventId, EventPatch, NewEvent,
    Visibility,
};
use crate::database::{connection::DatabaseManager, repository::EventRepository};
use crate::utils::logging::{log_database_error, log_database_operation};

/// Row of the `events` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    /// UUID text.
    pub id: String,
    /// Owner actor id.
    pub owner: String,
    /// Owner display name.
    pub owner_name: String,
    /// Event title.
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `public` or `private`.
    pub visibility: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

/// Row of the `event_comments` table.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    /// Event the comment belongs to.
    pub event_id: String,
    /// Author actor id.
    pub author: String,
    /// Author display name.
    pub author_name: String,
    /// Comment body.
    pub text: String,
}

impl EventRow {
    fn into_event(self, comments: Vec<Comment>) -> CalendarResult<Event> {
        let id = self
            .id
            .parse::<EventId>()
            .map_err(|_| CalendarError::Storage(format!("corrupt event id '{}'", self.id)))?;

        let visibility = self.visibility.parse::<Visibility>().unwrap_or_else(|_| {
            tracing::warn!(
                "Event {} has unknown visibility '{}', treating it as private",
                self.id,
                self.visibility
            );
            Visibility::Private
        });

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default();

        Ok(Event {
            id,
            owner: ActorId::new(self.owner),
            owner_name: self.owner_name,
            title: self.title,
            date: self.date,
            visibility,
            comments,
            created_at,
        })
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            author: ActorId::new(row.author),
            author_name: row.author_name,
            text: row.text,
        }
    }
}

const SELECT_EVENT: &str =
    "SELECT id, owner, owner_name, title, date, visibility, created_at FROM events";
const SELECT_COMMENT: &str = "SELECT event_id, author, author_name, text FROM event_comments";

fn not_found(id: &EventId) -> CalendarError {
    CalendarError::NotFound(format!("event {id}"))
}

async fn fetch_event(conn: &mut SqliteConnection, id: &EventId) -> CalendarResult<Option<Event>> {
    let id_str = id.to_string();

    let row = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENT} WHERE id = ?"))
        .bind(&id_str)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let comments = sqlx::query_as::<_, CommentRow>(&format!(
        "{SELECT_COMMENT} WHERE event_id = ? ORDER BY id"
    ))
    .bind(&id_str)
    .fetch_all(&mut *conn)
    .await?;

    row.into_event(comments.into_iter().map(Comment::from).collect())
        .map(Some)
}

async fn insert_comment(
    conn: &mut SqliteConnection,
    event_id: &str,
    comment: &Comment,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO event_comments (event_id, author, author_name, text, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(event_id)
    .bind(comment.author.as_str())
    .bind(&comment.author_name)
    .bind(&comment.text)
    .bind(Utc::now().to_rfc3339())
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl EventRepository for DatabaseManager {
    async fn create(&self, event: NewEvent) -> CalendarResult<EventId> {
        let event = event.into_event()?;
        let _guard = self.write_lock.lock().await;

        log_database_operation("INSERT", "events", Some(&event.id.to_string()));
        sqlx::query(
            r#"
            INSERT INTO events (id, owner, owner_name, title, date, visibility, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.id.to_string())
        .bind(event.owner.as_str())
        .bind(&event.owner_name)
        .bind(&event.title)
        .bind(&event.date)
        .bind(event.visibility.as_str())
        .bind(event.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            log_database_error("INSERT", "events", &e.to_string(), None);
            e
        })?;

        Ok(event.id)
    }

    async fn get(&self, id: &EventId) -> CalendarResult<Event> {
        let mut conn = self.pool.acquire().await?;
        fetch_event(&mut conn, id).await?.ok_or_else(|| not_found(id))
    }

    async fn list(&self) -> CalendarResult<Vec<Event>> {
        // One read transaction so events and comments come from the same snapshot.
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query_as::<_, EventRow>(&format!("{SELECT_EVENT} ORDER BY rowid"))
            .fetch_all(&mut *tx)
            .await?;
        let comment_rows = sqlx::query_as::<_, CommentRow>(&format!("{SELECT_COMMENT} ORDER BY id"))
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        let mut comments_by_event: HashMap<String, Vec<Comment>> = HashMap::new();
        for row in comment_rows {
            comments_by_event
                .entry(row.event_id.clone())
                .or_default()
                .push(Comment::from(row));
        }

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let comments = comments_by_event.remove(&row.id).unwrap_or_default();
            match row.into_event(comments) {
                Ok(event) => events.push(event),
                Err(e) => log_database_error("SELECT", "events", &e.to_string(), Some("row skipped")),
            }
        }

        Ok(events)
    }

    async fn update(&self, id: &EventId, patch: EventPatch) -> CalendarResult<Event> {
        patch.validate()?;
        let _guard = self.write_lock.lock().await;
        let id_str = id.to_string();

        log_database_operation("UPDATE", "events", Some(&id_str));
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE events SET date = COALESCE(?, date), title = COALESCE(?, title) WHERE id = ?",
        )
        .bind(patch.date.as_deref())
        .bind(patch.title.as_deref())
        .bind(&id_str)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(not_found(id));
        }

        if let Some(comment) = &patch.comment {
            insert_comment(&mut tx, &id_str, comment).await?;
        }

        let event = fetch_event(&mut tx, id).await?.ok_or_else(|| not_found(id))?;
        tx.commit().await?;

        Ok(event)
    }

    async fn delete(&self, id: &EventId) -> CalendarResult<()> {
        let _guard = self.write_lock.lock().await;
        let id_str = id.to_string();

        log_database_operation("DELETE", "events", Some(&id_str));
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM event_comments WHERE event_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tx.commit().await?;
        Ok(())
    }
}
