//! Authentication service - Checks a username/password pair.
//!
//! SOLID (SRP): Handles authentication concerns only.
//! Every rejection looks the same to the caller: unknown user, wrong password
//! and an unreadable stored credential all become `InvalidCredentials`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::credentials;
use crate::repository::UserRepository;
use common::{AppError, AppResult};
use domain::{UserLookup, UserProfile};

/// Well-formed credential that no password derives to. Checked when the
/// username is unknown so that path still pays for one key derivation.
const DUMMY_CREDENTIAL: &str = concat!(
    "00000000000000000000000000000000",
    "$",
    "0000000000000000000000000000000000000000000000000000000000000000"
);

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and return the user's public profile
    async fn login(&self, username: &str, password: &str) -> AppResult<UserProfile>;
}

/// Concrete implementation of AuthService using the user repository.
pub struct Authenticator {
    repo: Arc<dyn UserRepository>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, username: &str, password: &str) -> AppResult<UserProfile> {
        let user = match self.repo.get(UserLookup::by_username(username)).await {
            Ok(user) => Some(user),
            Err(AppError::NotFound) => None,
            Err(e) => return Err(e),
        };

        let stored = match &user {
            Some(user) => user.password_hash.clone(),
            None => DUMMY_CREDENTIAL.to_string(),
        };

        let verified = credentials::verify_password(password.to_string(), stored).await?;

        match (user, verified) {
            (Some(user), Ok(true)) => {
                tracing::info!(user_id = user.id, %username, "Login succeeded");
                Ok(user.into())
            }
            (None, _) => {
                tracing::warn!(%username, "Login rejected: unknown user");
                Err(AppError::InvalidCredentials)
            }
            (Some(_), Ok(false)) => {
                tracing::warn!(%username, "Login rejected: wrong password");
                Err(AppError::InvalidCredentials)
            }
            (Some(_), Err(_)) => {
                tracing::warn!(%username, "Login rejected: stored credential is malformed");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}
