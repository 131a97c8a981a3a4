//! Database connection management.
//!
//! There is no shared pool: every operation opens its own connection through
//! [`Database::with_connection`] or [`Database::with_transaction`], which
//! close it again on every exit path.

use std::time::Duration;

use futures::future::BoxFuture;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection,
    DatabaseTransaction, Statement, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use common::{AppError, AppResult, DatabaseConfig};

use super::migrations::Migrator;

/// Connection factory for the users database.
#[derive(Clone)]
pub struct Database {
    options: ConnectOptions,
}

// The connect options embed the URL, password included
impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("options", &"[REDACTED]")
            .finish()
    }
}

impl Database {
    /// Build a connection factory from validated configuration.
    pub fn new(config: &DatabaseConfig) -> Self {
        let mut database = Self::from_url(config.url());
        database
            .options
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        database
    }

    /// Build a connection factory for an explicit database URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        let mut options = ConnectOptions::new(url.into());
        options.max_connections(1).sqlx_logging(false);
        Self { options }
    }

    /// Open a fresh connection.
    pub async fn open(&self) -> AppResult<DatabaseConnection> {
        SeaDatabase::connect(self.options.clone())
            .await
            .map_err(AppError::from)
    }

    /// Close a connection opened by [`Database::open`].
    pub async fn release(conn: DatabaseConnection) {
        if let Err(e) = conn.close().await {
            tracing::warn!("Failed to close database connection: {}", e);
        }
    }

    /// Run `f` on a fresh connection and close it afterwards.
    pub async fn with_connection<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(&'c DatabaseConnection) -> BoxFuture<'c, AppResult<T>> + Send,
        T: Send,
    {
        let conn = self.open().await?;
        let result = f(&conn).await;
        Self::release(conn).await;
        result
    }

    /// Run `f` inside a transaction on a fresh connection.
    ///
    /// The transaction is committed when `f` succeeds and rolled back before
    /// returning when it fails. The connection is closed either way.
    pub async fn with_transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, AppResult<T>> + Send,
        T: Send,
    {
        let conn = self.open().await?;
        let result = Self::execute_transaction(&conn, f).await;
        Self::release(conn).await;
        result
    }

    async fn execute_transaction<F, T>(conn: &DatabaseConnection, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, AppResult<T>> + Send,
        T: Send,
    {
        let txn = conn.begin().await.map_err(AppError::from)?;

        match f(&txn).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        self.with_connection(|conn| Box::pin(async move { Ok(Migrator::up(conn, None).await?) }))
            .await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> AppResult<()> {
        self.with_connection(|conn| {
            Box::pin(async move { Ok(Migrator::down(conn, Some(1)).await?) })
        })
        .await
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> AppResult<Vec<(String, bool)>> {
        self.with_connection(|conn| {
            Box::pin(async move {
                use sea_orm::{EntityTrait, QueryOrder};
                use sea_orm_migration::seaql_migrations;

                // Get applied migrations from database
                let applied: std::collections::HashSet<String> = seaql_migrations::Entity::find()
                    .order_by_asc(seaql_migrations::Column::Version)
                    .all(conn)
                    .await?
                    .into_iter()
                    .map(|m| m.version)
                    .collect();

                Ok(Migrator::migrations()
                    .iter()
                    .map(|m| {
                        let name = m.name().to_string();
                        let is_applied = applied.contains(&name);
                        (name, is_applied)
                    })
                    .collect())
            })
        })
        .await
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> AppResult<()> {
        self.with_connection(|conn| Box::pin(async move { Ok(Migrator::fresh(conn).await?) }))
            .await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> AppResult<()> {
        self.with_connection(|conn| {
            Box::pin(async move {
                conn.execute(Statement::from_string(
                    conn.get_database_backend(),
                    "SELECT 1".to_string(),
                ))
                .await?;
                Ok(())
            })
        })
        .await
    }
}
