//! User Service Library
//!
//! User record management and password authentication over a relational
//! store. The binary in `main.rs` is a thin command-line front end; other
//! callers embed the library and use [`Services`] directly.

pub mod config;
pub mod credentials;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use common::AppResult;
use tracing::info;

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{AuthService, Authenticator, UserManager, UserService};

/// The caller-facing services, wired to one store.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserService>,
    pub auth: Arc<dyn AuthService>,
}

impl Services {
    /// Wire repository and services on top of a connection factory.
    pub fn new(db: Database) -> Self {
        let user_repo = Arc::new(UserStore::new(db));

        Self {
            users: Arc::new(UserManager::new(user_repo.clone())),
            auth: Arc::new(Authenticator::new(user_repo)),
        }
    }

    /// Wire services for the configured database.
    pub fn from_config(config: &UserServiceConfig) -> Self {
        Self::new(Database::new(&config.database))
    }
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run a migration action against `db`.
///
/// `Status` returns one `(name, applied)` pair per known migration; the other
/// actions return an empty list.
pub async fn run_migrations(db: &Database, action: MigrateAction) -> AppResult<Vec<(String, bool)>> {
    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => return db.migration_status().await,
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(Vec::new())
}
