//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity and its projections, and the credential codec used to
//! hash, encode and verify passwords.

pub mod constants;
pub mod credential;
pub mod error;
pub mod user;

pub use constants::*;
pub use credential::{Credential, CredentialParts, DerivedKey};
pub use error::{DomainError, DomainResult};
pub use user::{LookupKey, NewUser, User, UserChanges, UserLookup, UserProfile};
