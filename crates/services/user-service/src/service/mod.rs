//! User and authentication business logic.

mod auth_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator};
pub use user_service::{UserManager, UserService};
