use async_trait::async_trait;
use chrono::Utc;

use crate::calendar::{ActorId, CalendarResult};
use crate::database::{connection::DatabaseManager, repository::ModeratorRegistry};
use crate::utils::logging::log_database_operation;

#[async_trait]
impl ModeratorRegistry for DatabaseManager {
    async fn is_moderator(&self, actor: &ActorId) -> CalendarResult<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM moderators WHERE actor_id = ?",
        )
        .bind(actor.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    async fn promote(&self, actor: &ActorId) -> CalendarResult<bool> {
        let _guard = self.write_lock.lock().await;

        log_database_operation("INSERT", "moderators", Some(actor.as_str()));
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO moderators (actor_id, promoted_at) VALUES (?, ?)",
        )
        .bind(actor.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(inserted.rows_affected() > 0)
    }

    async fn list(&self) -> CalendarResult<Vec<ActorId>> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT actor_id FROM moderators ORDER BY actor_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(ActorId::new).collect())
    }
}
