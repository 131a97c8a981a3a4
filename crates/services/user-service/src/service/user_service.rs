//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! Nothing returned from here carries a password hash.

use async_trait::async_trait;
use std::sync::Arc;

use common::AppResult;
use domain::{NewUser, UserChanges, UserLookup, UserProfile};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new user, returning the generated id
    async fn create_user(&self, new_user: NewUser) -> AppResult<i32>;

    /// Get a user's public profile by username
    async fn get_user(&self, username: &str) -> AppResult<UserProfile>;

    /// Get a user's public profile by id
    async fn get_user_by_id(&self, id: i32) -> AppResult<UserProfile>;

    /// Update the provided fields of a user
    async fn update_user(&self, username: &str, changes: UserChanges) -> AppResult<()>;

    /// Permanently delete a user
    async fn delete_user(&self, username: &str) -> AppResult<()>;

    /// List all users ordered by id
    async fn list_users(&self) -> AppResult<Vec<UserProfile>>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, new_user: NewUser) -> AppResult<i32> {
        let username = new_user.username.clone();
        let id = self.repo.create(new_user).await?;
        tracing::info!(user_id = id, %username, "User created");
        Ok(id)
    }

    async fn get_user(&self, username: &str) -> AppResult<UserProfile> {
        let user = self.repo.get(UserLookup::by_username(username)).await?;
        Ok(UserProfile::from(user))
    }

    async fn get_user_by_id(&self, id: i32) -> AppResult<UserProfile> {
        let user = self.repo.get(UserLookup::by_id(id)).await?;
        Ok(user.into())
    }

    async fn update_user(&self, username: &str, changes: UserChanges) -> AppResult<()> {
        let password_changed = changes.password.is_some();
        self.repo.update(username, changes).await?;
        tracing::info!(%username, password_changed, "User updated");
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> AppResult<()> {
        self.repo.delete(username).await?;
        tracing::info!(%username, "User deleted");
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserProfile>> {
        self.repo.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::AppError;
    use domain::User;
    use mockall::predicate::eq;

    use crate::repository::MockUserRepository;

    fn create_test_user(id: i32, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            display_name: "Alice A".to_string(),
            email: "a@x.com".to_string(),
            religion: "none".to_string(),
            password_hash: "00ff$abcd".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_returns_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|new_user| new_user.username == "alice" && new_user.password == "pw1")
            .times(1)
            .returning(|_| Ok(42));

        let service = UserManager::new(Arc::new(repo));
        let id = service
            .create_user(NewUser::new("alice", "Alice A", "a@x.com", "none", "pw1"))
            .await
            .unwrap();

        assert_eq!(id, 42);
    }

    #[tokio::test]
    async fn test_create_user_duplicate() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::DuplicateUsername));

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .create_user(NewUser::new("alice", "Alice A", "a@x.com", "none", "pw1"))
            .await;

        assert!(matches!(result, Err(AppError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_get_user_strips_hash() {
        let mut repo = MockUserRepository::new();
        repo.expect_get()
            .with(eq(UserLookup::by_username("alice")))
            .returning(|_| Ok(create_test_user(1, "alice")));

        let service = UserManager::new(Arc::new(repo));
        let profile = service.get_user("alice").await.unwrap();

        assert_eq!(profile.id, 1);
        assert_eq!(profile.username, "alice");
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_get()
            .with(eq(UserLookup::by_id(7)))
            .returning(|_| Ok(create_test_user(7, "bob")));

        let service = UserManager::new(Arc::new(repo));
        let profile = service.get_user_by_id(7).await.unwrap();

        assert_eq!(profile.username, "bob");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get().returning(|_| Err(AppError::NotFound));

        let service = UserManager::new(Arc::new(repo));
        let result = service.get_user("ghost").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_user_passes_changes_through() {
        let mut repo = MockUserRepository::new();
        repo.expect_update()
            .withf(|username, changes| {
                username == "alice"
                    && changes.email.as_deref() == Some("a2@x.com")
                    && changes.display_name.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .update_user("alice", UserChanges::default().email("a2@x.com"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .withf(|username| username == "ghost")
            .returning(|_| Err(AppError::NotFound));

        let service = UserManager::new(Arc::new(repo));
        let result = service.delete_user("ghost").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_users_empty() {
        let mut repo = MockUserRepository::new();
        repo.expect_list().returning(|| Ok(vec![]));

        let service = UserManager::new(Arc::new(repo));
        let users = service.list_users().await.unwrap();

        assert!(users.is_empty());
    }
}
