use anyhow::{anyhow, Result};
use shared_calendar_bot::config::database_url_from_env;
use shared_calendar_bot::database::connection::sqlite_file_path;
use shared_calendar_bot::database::{DatabaseManager, ModeratorRegistry};
use shared_calendar_bot::utils::validation::validate_actor_id;
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize basic logging for the migration
    env_logger::init();
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "promote" => match args.get(2) {
            Some(actor) => promote_moderator(actor).await,
            None => Err(anyhow!("Usage: migrate promote <user-id>")),
        },
        "moderators" => list_moderators().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

async fn open_database() -> Result<DatabaseManager> {
    let database_url = database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Shared Calendar Bot - Database Migration Tool");
    println!("================================================");

    let db_manager = open_database().await?;

    println!("🚀 Running database migrations...");
    match db_manager.run_migrations().await {
        Ok(_) => {
            println!("✅ Migrations completed successfully!");
            println!("\n🎯 Your calendar database is ready!");
        }
        Err(e) => {
            eprintln!("❌ Migration failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let db_manager = open_database().await?;

    match db_manager.table_names().await {
        Ok(tables) => {
            println!("✅ Database connection successful!");
            println!("📋 Found tables:");
            for table in tables {
                println!("  • {table}");
            }
        }
        Err(e) => {
            println!("⚠️  Database check failed: {e}");
            println!("💡 Try running 'migrate up' to create the schema");
        }
    }

    Ok(())
}

/// Seeds the registry out of band; the dialogue has no way to create the first moderator.
async fn promote_moderator(actor: &str) -> Result<()> {
    let actor = validate_actor_id(actor)?;
    let db_manager = open_database().await?;
    db_manager.run_migrations().await?;

    if db_manager.promote(&actor).await? {
        println!("🛡 {actor} is now a moderator.");
    } else {
        println!("ℹ️  {actor} is already a moderator.");
    }

    Ok(())
}

async fn list_moderators() -> Result<()> {
    let db_manager = open_database().await?;
    let moderators = ModeratorRegistry::list(&db_manager).await?;

    if moderators.is_empty() {
        println!("No moderators yet. Use 'migrate promote <user-id>' to add one.");
    } else {
        println!("🛡 Moderators:");
        for moderator in moderators {
            println!("  • {moderator}");
        }
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL data in the database!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = database_url_from_env();

    // For SQLite, we can just delete the file
    match sqlite_file_path(&database_url) {
        Some(db_path) => {
            if db_path.exists() {
                std::fs::remove_file(&db_path)?;
                println!("🗑️  Deleted database file: {}", db_path.display());
            }
        }
        None => return Err(anyhow!("Reset is only supported for file-backed SQLite databases")),
    }

    // Run migrations to recreate the schema
    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");

    Ok(())
}

fn mask_url(url: &str) -> String {
    // Don't show full paths in production logs
    match sqlite_file_path(url) {
        Some(path) => match Path::new(&path).file_name() {
            Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}

fn print_help() {
    println!("📅 Shared Calendar Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up          Run database migrations (default)");
    println!("    check                Check database connection and schema");
    println!("    reset                Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    promote <user-id>    Add a moderator (bootstraps the registry)");
    println!("    moderators           List moderators");
    println!("    help                 Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:./data/calendar.db)");
    println!();
    println!("EXAMPLES:");
    println!("    migrate                    # Run migrations");
    println!("    migrate promote 123456789  # Make Telegram user 123456789 a moderator");
    println!("    migrate reset              # Reset database (careful!)");
    println!();
}
