//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own on-disk SQLite database in the temp directory,
//! migrated with the production `Migrator`. The file is removed on drop.

#![allow(dead_code)]

use std::path::PathBuf;

use uuid::Uuid;

use domain::NewUser;
use user_service_lib::infra::Database;
use user_service_lib::repository::UserStore;
use user_service_lib::Services;

pub struct TestStore {
    path: PathBuf,
    pub db: Database,
}

impl TestStore {
    pub async fn new() -> Self {
        let path = std::env::temp_dir().join(format!("user-service-test-{}.db", Uuid::new_v4()));
        let db = Database::from_url(format!("sqlite://{}?mode=rwc", path.display()));
        db.run_migrations().await.expect("migrations should apply");

        Self { path, db }
    }

    pub fn repo(&self) -> UserStore {
        UserStore::new(self.db.clone())
    }

    pub fn services(&self) -> Services {
        Services::new(self.db.clone())
    }
}

impl Drop for TestStore {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

pub fn alice() -> NewUser {
    NewUser::new("alice", "Alice A", "a@x.com", "none", "pw1")
}

pub fn bob() -> NewUser {
    NewUser::new("bob", "Bob B", "b@x.com", "other", "pw2")
}
