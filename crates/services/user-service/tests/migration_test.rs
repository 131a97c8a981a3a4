//! Migration management against SQLite.

mod support;

use user_service_lib::{run_migrations, MigrateAction};

use support::{alice, TestStore};

#[tokio::test]
async fn test_status_reflects_up_and_down() {
    let store = TestStore::new().await;

    let status = run_migrations(&store.db, MigrateAction::Status).await.unwrap();
    assert_eq!(status.len(), 1);
    assert!(status.iter().all(|(_, applied)| *applied));

    run_migrations(&store.db, MigrateAction::Down).await.unwrap();
    let status = run_migrations(&store.db, MigrateAction::Status).await.unwrap();
    assert!(status.iter().all(|(_, applied)| !*applied));
}

#[tokio::test]
async fn test_fresh_drops_existing_rows() {
    let store = TestStore::new().await;
    let services = store.services();
    services.users.create_user(alice()).await.unwrap();

    run_migrations(&store.db, MigrateAction::Fresh).await.unwrap();

    assert!(services.users.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ping() {
    let store = TestStore::new().await;

    assert!(store.db.ping().await.is_ok());
}
