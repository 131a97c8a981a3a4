//! Domain-level constants.
//!
//! These constants define the credential format and validation rules.

// =============================================================================
// Credential derivation
// =============================================================================

/// PBKDF2-HMAC-SHA256 iteration count
pub const PBKDF2_ITERATIONS: u32 = 310_000;

/// Number of random salt bytes generated for a new credential
pub const SALT_LENGTH: usize = 16;

/// Derived key length (SHA-256 output size)
pub const HASH_LENGTH: usize = 32;

/// Separator between the salt and hash segments of an encoded credential
pub const HASH_DELIMITER: char = '$';

// =============================================================================
// Lookups
// =============================================================================

/// Message used when a lookup names neither (or both) of its keys
pub const LOOKUP_KEY_REQUIRED: &str = "Exactly one of username or id must be provided";

/// Message used when an update carries no field changes
pub const NO_CHANGES_REQUESTED: &str = "No updates requested";
