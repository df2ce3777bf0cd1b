use anyhow::Result;
use shared_calendar_bot::calendar::{
    ActorId, Comment, ErrorKind, EventPatch, NewEvent, Visibility,
};
use shared_calendar_bot::database::{
    DatabaseManager, EventRepository, InMemoryEventRepository, InMemoryModeratorRegistry,
    ModeratorRegistry,
};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

fn new_event(owner: &str, date: &str, title: &str, visibility: Visibility) -> NewEvent {
    NewEvent {
        owner: ActorId::new(owner),
        owner_name: owner.to_uppercase(),
        title: title.to_string(),
        date: date.to_string(),
        visibility,
    }
}

fn comment(author: &str, text: &str) -> Comment {
    Comment {
        author: ActorId::new(author),
        author_name: author.to_uppercase(),
        text: text.to_string(),
    }
}

async fn check_create_get_list(repo: &dyn EventRepository) -> Result<()> {
    let first = repo
        .create(new_event("alice", "2025-06-01", "Sync", Visibility::Private))
        .await?;
    let second = repo
        .create(new_event("bob", "2025-05-01", "Retro", Visibility::Public))
        .await?;

    let event = repo.get(&first).await?;
    assert_eq!(event.id, first);
    assert_eq!(event.owner, ActorId::new("alice"));
    assert_eq!(event.owner_name, "ALICE");
    assert_eq!(event.title, "Sync");
    assert_eq!(event.date, "2025-06-01");
    assert_eq!(event.visibility, Visibility::Private);
    assert!(event.comments.is_empty());

    // Insertion order, not date order
    let ids: Vec<_> = repo.list().await?.into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first, second]);
    Ok(())
}

async fn check_update_and_comments(repo: &dyn EventRepository) -> Result<()> {
    let id = repo
        .create(new_event("alice", "2025-06-01", "Sync", Visibility::Public))
        .await?;

    repo.update(&id, EventPatch::comment(comment("bob", "first"))).await?;
    repo.update(&id, EventPatch::comment(comment("carol", "second"))).await?;
    let updated = repo
        .update(&id, EventPatch::reschedule("2025-06-02", "Sync moved"))
        .await?;

    assert_eq!(updated.date, "2025-06-02");
    assert_eq!(updated.title, "Sync moved");
    let texts: Vec<_> = updated.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(updated.comments[0].author, ActorId::new("bob"));

    let listed = repo.list().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, updated.title);
    assert_eq!(listed[0].comments, updated.comments);

    let err = repo
        .update(&id, EventPatch::reschedule("2025-06-02", "  "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(repo.get(&id).await?.title, "Sync moved");
    Ok(())
}

async fn check_delete(repo: &dyn EventRepository) -> Result<()> {
    let id = repo
        .create(new_event("alice", "2025-06-01", "Sync", Visibility::Public))
        .await?;
    repo.update(&id, EventPatch::comment(comment("bob", "hi"))).await?;

    repo.delete(&id).await?;

    assert!(repo.list().await?.is_empty());
    assert_eq!(repo.get(&id).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(repo.delete(&id).await.unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        repo.update(&id, EventPatch::comment(comment("bob", "late")))
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );

    // Same title and date again gets a fresh id
    let recreated = repo
        .create(new_event("alice", "2025-06-01", "Sync", Visibility::Public))
        .await?;
    assert_ne!(recreated, id);
    assert!(repo.get(&recreated).await?.comments.is_empty());
    Ok(())
}

async fn check_delete_keeps_other_ids(repo: &dyn EventRepository) -> Result<()> {
    let a = repo.create(new_event("alice", "2025-06-01", "A", Visibility::Public)).await?;
    let b = repo.create(new_event("alice", "2025-06-02", "B", Visibility::Public)).await?;
    let c = repo.create(new_event("alice", "2025-06-03", "C", Visibility::Public)).await?;

    repo.delete(&a).await?;

    assert_eq!(repo.get(&b).await?.title, "B");
    assert_eq!(repo.get(&c).await?.title, "C");
    Ok(())
}

async fn check_rejects_empty_title(repo: &dyn EventRepository) -> Result<()> {
    let err = repo
        .create(new_event("alice", "2025-06-01", " ", Visibility::Public))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(repo.list().await?.is_empty());
    Ok(())
}

async fn check_promotion(registry: &dyn ModeratorRegistry) -> Result<()> {
    let bob = ActorId::new("bob");
    assert!(!registry.is_moderator(&bob).await?);

    assert!(registry.promote(&bob).await?);
    assert!(!registry.promote(&bob).await?);

    assert!(registry.is_moderator(&bob).await?);
    assert_eq!(registry.list().await?, vec![bob]);
    Ok(())
}

#[tokio::test]
async fn test_memory_repository() -> Result<()> {
    check_create_get_list(&InMemoryEventRepository::new()).await?;
    check_update_and_comments(&InMemoryEventRepository::new()).await?;
    check_delete(&InMemoryEventRepository::new()).await?;
    check_delete_keeps_other_ids(&InMemoryEventRepository::new()).await?;
    check_rejects_empty_title(&InMemoryEventRepository::new()).await?;
    Ok(())
}

#[tokio::test]
async fn test_memory_registry() -> Result<()> {
    check_promotion(&InMemoryModeratorRegistry::new()).await?;

    let seeded = InMemoryModeratorRegistry::with_moderators(vec![ActorId::new("root")]);
    assert!(seeded.is_moderator(&ActorId::new("root")).await?);
    Ok(())
}

#[tokio::test]
async fn test_sqlite_create_get_list() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    check_create_get_list(&db).await
}

#[tokio::test]
async fn test_sqlite_update_and_comments() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    check_update_and_comments(&db).await
}

#[tokio::test]
async fn test_sqlite_delete() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    check_delete(&db).await?;
    check_delete_keeps_other_ids(&db).await
}

#[tokio::test]
async fn test_sqlite_rejects_empty_title() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    check_rejects_empty_title(&db).await
}

#[tokio::test]
async fn test_sqlite_registry() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    check_promotion(&db).await
}

#[tokio::test]
async fn test_sqlite_data_survives_reconnect() -> Result<()> {
    let (db, temp_dir) = setup_test_db().await?;
    let id = db
        .create(new_event("alice", "2025-06-01", "Sync", Visibility::Private))
        .await?;
    db.update(&id, EventPatch::comment(comment("bob", "hi"))).await?;
    db.promote(&ActorId::new("bob")).await?;
    drop(db);

    let url = format!("sqlite:{}", temp_dir.path().join("test.db").display());
    let reopened = DatabaseManager::new(&url).await?;
    reopened.run_migrations().await?;

    let event = reopened.get(&id).await?;
    assert_eq!(event.comments.len(), 1);
    assert_eq!(event.visibility, Visibility::Private);
    assert!(reopened.is_moderator(&ActorId::new("bob")).await?);
    Ok(())
}

#[tokio::test]
async fn test_sqlite_unknown_visibility_is_treated_as_private() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let id = db
        .create(new_event("alice", "2025-06-01", "Sync", Visibility::Public))
        .await?;

    sqlx::query("UPDATE events SET visibility = 'friends' WHERE id = ?")
        .bind(id.to_string())
        .execute(&db.pool)
        .await?;

    assert_eq!(db.get(&id).await?.visibility, Visibility::Private);
    Ok(())
}

#[tokio::test]
async fn test_sqlite_concurrent_comments_are_not_lost() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;
    let id = db
        .create(new_event("alice", "2025-06-01", "Sync", Visibility::Public))
        .await?;

    let mut handles = Vec::new();
    for n in 0..10 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            db.update(&id, EventPatch::comment(comment("bob", &format!("c{n}"))))
                .await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    assert_eq!(db.get(&id).await?.comments.len(), 10);
    Ok(())
}
