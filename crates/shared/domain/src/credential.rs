//! Credential codec - Password hashing, encoding and verification.
//!
//! Passwords are stretched with PBKDF2-HMAC-SHA256 and stored as
//! `<salt_hex>$<hash_hex>`. Verification re-derives the key with the stored
//! salt and compares in constant time.

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::constants::{HASH_DELIMITER, HASH_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Output of a key derivation: the derived hash and the salt it was made with.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    pub hash: [u8; HASH_LENGTH],
    pub salt: Vec<u8>,
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("hash", &"[REDACTED]")
            .field("salt", &"[REDACTED]")
            .finish()
    }
}

/// The two hex segments of an encoded credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialParts {
    pub salt_hex: String,
    pub hash_hex: String,
}

impl CredentialParts {
    /// Raw salt bytes.
    pub fn salt_bytes(&self) -> DomainResult<Vec<u8>> {
        hex::decode(&self.salt_hex).map_err(|_| DomainError::MalformedCredential)
    }

    /// Raw hash bytes.
    pub fn hash_bytes(&self) -> DomainResult<Vec<u8>> {
        hex::decode(&self.hash_hex).map_err(|_| DomainError::MalformedCredential)
    }
}

/// Derive a key from `password`.
///
/// A fresh random salt of [`SALT_LENGTH`] bytes is drawn from the OS RNG when
/// `salt` is `None`. The same `(password, salt)` always yields the same hash.
pub fn derive(password: &str, salt: Option<&[u8]>) -> DerivedKey {
    let salt = match salt {
        Some(salt) => salt.to_vec(),
        None => {
            let mut salt = vec![0u8; SALT_LENGTH];
            OsRng.fill_bytes(&mut salt);
            salt
        }
    };

    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);

    DerivedKey { hash, salt }
}

/// Encode a derived key as `<salt_hex>$<hash_hex>`.
pub fn encode(key: &DerivedKey) -> String {
    format!(
        "{}{}{}",
        hex::encode(&key.salt),
        HASH_DELIMITER,
        hex::encode(key.hash)
    )
}

/// Split an encoded credential into its salt and hash segments.
///
/// # Errors
/// Returns [`DomainError::MalformedCredential`] unless the string contains
/// exactly one delimiter.
pub fn decode(stored: &str) -> DomainResult<CredentialParts> {
    let mut parts = stored.split(HASH_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(salt_hex), Some(hash_hex), None) => Ok(CredentialParts {
            salt_hex: salt_hex.to_string(),
            hash_hex: hash_hex.to_string(),
        }),
        _ => Err(DomainError::MalformedCredential),
    }
}

/// Check `password` against an encoded credential.
///
/// The recomputed hash is compared with [`subtle::ConstantTimeEq`], so the
/// comparison never exits on the first differing byte. A mismatch is
/// `Ok(false)`; only an undecodable `stored` value is an error.
pub fn verify(password: &str, stored: &str) -> DomainResult<bool> {
    let parts = decode(stored)?;
    let salt = parts.salt_bytes()?;
    let expected = parts.hash_bytes()?;

    let recomputed = derive(password, Some(&salt));
    Ok(recomputed.hash[..].ct_eq(&expected[..]).into())
}

/// Credential value object that handles hashing and verification.
///
/// Wraps the encoded `<salt_hex>$<hash_hex>` string as stored in the
/// `password_hash` column.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    encoded: String,
}

// Don't expose the hash in debug output
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    /// Hash a plaintext password with a freshly generated salt.
    pub fn new(plain_text: &str) -> Self {
        Self {
            encoded: encode(&derive(plain_text, None)),
        }
    }

    /// Wrap an encoded credential loaded from storage.
    pub fn from_stored(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// Get the encoded string for storage.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Consume and return the encoded string.
    pub fn into_string(self) -> String {
        self.encoded
    }

    /// Verify a plaintext password against this credential.
    pub fn verify(&self, plain_text: &str) -> DomainResult<bool> {
        verify(plain_text, &self.encoded)
    }
}

impl From<Credential> for String {
    fn from(credential: Credential) -> Self {
        credential.encoded
    }
}
