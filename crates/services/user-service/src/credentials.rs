//! Key derivation off the async runtime.
//!
//! PBKDF2 at 310k rounds is deliberately slow, so both hashing and
//! verification run on tokio's blocking pool.

use common::{AppError, AppResult};
use domain::{Credential, DomainResult};

/// Hash a plaintext password into its encoded storage form.
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || Credential::new(&password).into_string())
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))
}

/// Verify a plaintext password against an encoded credential.
///
/// The outer result reports a failed blocking task, the inner one a
/// malformed stored credential.
pub async fn verify_password(password: String, stored: String) -> AppResult<DomainResult<bool>> {
    tokio::task::spawn_blocking(move || Credential::from_stored(stored).verify(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}
