//! User repository implementation.
//!
//! Every method opens its own connection. Mutations run in a transaction
//! that is rolled back before the method returns an error, so a failed call
//! never leaves a partial write behind.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::credentials;
use crate::infra::Database;
use common::{AppError, AppResult, OptionExt};
use domain::{LookupKey, NewUser, User, UserChanges, UserLookup, UserProfile};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Hash the password and insert a new user, returning its id
    async fn create(&self, new_user: NewUser) -> AppResult<i32>;

    /// Fetch one user, password hash included
    async fn get(&self, lookup: UserLookup) -> AppResult<User>;

    /// Apply a partial update to the user named `username`
    async fn update(&self, username: &str, changes: UserChanges) -> AppResult<()>;

    /// Physically delete the user named `username`
    async fn delete(&self, username: &str) -> AppResult<()>;

    /// List all users ordered by id, without password hashes
    async fn list(&self) -> AppResult<Vec<UserProfile>>;
}

/// Concrete implementation of UserRepository backed by SeaORM
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Map a failed INSERT/UPDATE. The only unique constraint on `users` is the
/// username.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateUsername,
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, new_user: NewUser) -> AppResult<i32> {
        let NewUser {
            username,
            display_name,
            email,
            religion,
            password,
        } = new_user;

        let password_hash = credentials::hash_password(password).await?;

        let id = self
            .db
            .with_transaction(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let active_model = ActiveModel {
                        username: Set(username),
                        display_name: Set(display_name),
                        email: Set(email),
                        religion: Set(religion),
                        password_hash: Set(password_hash),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };

                    let model = active_model.insert(txn).await.map_err(map_write_error)?;
                    Ok(model.id)
                })
            })
            .await?;

        tracing::debug!(user_id = id, "User row inserted");
        Ok(id)
    }

    async fn get(&self, lookup: UserLookup) -> AppResult<User> {
        let key = lookup.key()?;

        self.db
            .with_connection(move |conn| {
                Box::pin(async move {
                    let query = match key {
                        LookupKey::Username(username) => {
                            UserEntity::find().filter(user::Column::Username.eq(username))
                        }
                        LookupKey::Id(id) => UserEntity::find_by_id(id),
                    };

                    query.one(conn).await?.map(User::from).ok_or_not_found()
                })
            })
            .await
    }

    async fn update(&self, username: &str, changes: UserChanges) -> AppResult<()> {
        changes.ensure_not_empty()?;

        let UserChanges {
            username: new_username,
            display_name,
            email,
            religion,
            password,
        } = changes;

        let password_hash = match password {
            Some(password) => Some(credentials::hash_password(password).await?),
            None => None,
        };

        let target = username.to_string();
        self.db
            .with_transaction(move |txn| {
                Box::pin(async move {
                    // Only set columns are written; updated_at always is
                    let mut patch = ActiveModel {
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    };
                    if let Some(new_username) = new_username {
                        patch.username = Set(new_username);
                    }
                    if let Some(display_name) = display_name {
                        patch.display_name = Set(display_name);
                    }
                    if let Some(email) = email {
                        patch.email = Set(email);
                    }
                    if let Some(religion) = religion {
                        patch.religion = Set(religion);
                    }
                    if let Some(password_hash) = password_hash {
                        patch.password_hash = Set(password_hash);
                    }

                    let result = UserEntity::update_many()
                        .set(patch)
                        .filter(user::Column::Username.eq(target))
                        .exec(txn)
                        .await
                        .map_err(map_write_error)?;

                    if result.rows_affected == 0 {
                        return Err(AppError::NotFound);
                    }

                    Ok(())
                })
            })
            .await
    }

    async fn delete(&self, username: &str) -> AppResult<()> {
        let target = username.to_string();

        self.db
            .with_transaction(move |txn| {
                Box::pin(async move {
                    let result = UserEntity::delete_many()
                        .filter(user::Column::Username.eq(target))
                        .exec(txn)
                        .await
                        .map_err(AppError::from)?;

                    if result.rows_affected == 0 {
                        return Err(AppError::NotFound);
                    }

                    Ok(())
                })
            })
            .await
    }

    async fn list(&self) -> AppResult<Vec<UserProfile>> {
        self.db
            .with_connection(|conn| {
                Box::pin(async move {
                    let models = UserEntity::find()
                        .order_by_asc(user::Column::Id)
                        .all(conn)
                        .await
                        .map_err(AppError::from)?;

                    Ok(models
                        .into_iter()
                        .map(|model| UserProfile::from(User::from(model)))
                        .collect())
                })
            })
            .await
    }
}
