//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{LOOKUP_KEY_REQUIRED, NO_CHANGES_REQUESTED};
use crate::error::{DomainError, DomainResult};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub religion: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection without the password hash
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// User profile (safe to return to callers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub religion: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            religion: user.religion,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            religion: user.religion.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User creation data transfer object
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    /// Free-form, stored as given
    pub religion: String,
    /// Plaintext password, hashed before it reaches storage
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
        religion: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            email: email.into(),
            religion: religion.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("religion", &self.religion)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Partial update. `None` fields are left untouched.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserChanges {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub religion: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    /// True when no field change was requested
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.display_name.is_none()
            && self.email.is_none()
            && self.religion.is_none()
            && self.password.is_none()
    }

    /// Reject an empty change set
    pub fn ensure_not_empty(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::invalid_argument(NO_CHANGES_REQUESTED));
        }
        Ok(())
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn religion(mut self, religion: impl Into<String>) -> Self {
        self.religion = Some(religion.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("religion", &self.religion)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Key for a single-user lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserLookup {
    pub username: Option<String>,
    pub id: Option<i32>,
}

/// A validated lookup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Username(String),
    Id(i32),
}

impl UserLookup {
    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            id: None,
        }
    }

    pub fn by_id(id: i32) -> Self {
        Self {
            username: None,
            id: Some(id),
        }
    }

    /// Resolve to exactly one key.
    ///
    /// # Errors
    /// `InvalidArgument` when neither or both keys are set.
    pub fn key(self) -> DomainResult<LookupKey> {
        match (self.username, self.id) {
            (Some(username), None) => Ok(LookupKey::Username(username)),
            (None, Some(id)) => Ok(LookupKey::Id(id)),
            _ => Err(DomainError::invalid_argument(LOOKUP_KEY_REQUIRED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            display_name: "Alice A".to_string(),
            email: "a@x.com".to_string(),
            religion: "none".to_string(),
            password_hash: "00ff$abcd".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_serialization_skips_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();

        assert_eq!(json["username"], "alice");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_profile_serialization_has_no_hash_key() {
        let json = serde_json::to_value(sample_user().profile()).unwrap();

        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_changes_empty() {
        assert!(UserChanges::default().is_empty());
        assert!(UserChanges::default().ensure_not_empty().is_err());
        assert!(!UserChanges::default().email("a2@x.com").is_empty());
        assert!(UserChanges::default().password("x").ensure_not_empty().is_ok());
    }

    #[test]
    fn test_changes_debug_redacts_password() {
        let debug = format!("{:?}", UserChanges::default().password("hunter2"));
        assert!(!debug.contains("hunter2"));

        let debug = format!("{:?}", NewUser::new("a", "b", "c", "d", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_lookup_requires_exactly_one_key() {
        assert_eq!(
            UserLookup::by_username("alice").key(),
            Ok(LookupKey::Username("alice".to_string()))
        );
        assert_eq!(UserLookup::by_id(7).key(), Ok(LookupKey::Id(7)));
        assert!(matches!(
            UserLookup::default().key(),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            UserLookup {
                username: Some("alice".to_string()),
                id: Some(1),
            }
            .key(),
            Err(DomainError::InvalidArgument(_))
        ));
    }
}
