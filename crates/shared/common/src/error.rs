//! Unified error handling.
//!
//! Every operation of the service reports one of a fixed set of error kinds.
//! Callers branch on the variant; messages never carry hashes or passwords.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Call-site misuse
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Credential errors
    #[error("Stored password hash is malformed")]
    MalformedCredential,

    #[error("Invalid username or password")]
    InvalidCredentials,

    // Resource errors
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User not found")]
    NotFound,

    // External service errors
    #[cfg(feature = "database")]
    #[error("Storage error")]
    Storage(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error")]
    Internal(String),
}

impl AppError {
    /// Get error code for callers
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::MalformedCredential => "MALFORMED_CREDENTIAL",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::DuplicateUsername => "DUPLICATE_USERNAME",
            AppError::NotFound => "NOT_FOUND",
            #[cfg(feature = "database")]
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidArgument(msg) => msg.clone(),

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                "A storage error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// True for failures of the backing store
    pub fn is_storage(&self) -> bool {
        match self {
            #[cfg(feature = "database")]
            AppError::Storage(_) => true,
            _ => false,
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MalformedCredential => AppError::MalformedCredential,
            DomainError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Raised while assembling configuration, before any component is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_conversion() {
        assert!(matches!(
            AppError::from(DomainError::MalformedCredential),
            AppError::MalformedCredential
        ));
        assert!(matches!(
            AppError::from(DomainError::invalid_argument("No updates requested")),
            AppError::InvalidArgument(msg) if msg == "No updates requested"
        ));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound.code(), "NOT_FOUND");
        assert_eq!(AppError::DuplicateUsername.code(), "DUPLICATE_USERNAME");
        assert_eq!(AppError::InvalidCredentials.code(), "INVALID_CREDENTIALS");
        assert_eq!(AppError::MalformedCredential.code(), "MALFORMED_CREDENTIAL");
        assert_eq!(AppError::invalid_argument("x").code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("hashing task panicked at src/x.rs");
        assert_eq!(err.user_message(), "An internal error occurred");
        assert!(!err.is_storage());
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<i32> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
        assert_eq!(Some(3).ok_or_not_found().unwrap(), 3);
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_storage_message_is_hidden() {
        let err = AppError::from(sea_orm::DbErr::Custom("relation users does not exist".into()));
        assert_eq!(err.code(), "STORAGE_ERROR");
        assert_eq!(err.user_message(), "A storage error occurred");
        assert!(err.is_storage());
    }
}
