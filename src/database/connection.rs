use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// SQLite-backed event repository and moderator registry.
///
/// All mutations go through `write_lock` and run in a transaction, so two
/// actors editing the same event cannot interleave.
#[derive(Clone)]
pub struct DatabaseManager {
    /// Connection pool shared by all queries.
    pub pool: SqlitePool,
    pub(crate) write_lock: Arc<Mutex<()>>,
}

impl DatabaseManager {
    /// Opens the database, creating the file and its directory when missing.
    pub async fn new(database_url: &str) -> Result<Self> {
        if let Some(parent) = sqlite_file_path(database_url).as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating directory {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }

        // Create database if it doesn't exist
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating database {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        Ok(Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Applies the embedded migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Cheap connectivity probe used by the health endpoint.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Names of all tables, for the `migrate check` command.
    pub async fn table_names(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
    }
}

/// File behind a `sqlite:` URL, or `None` for in-memory databases.
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let path = database_url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("//").unwrap_or(path);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}
