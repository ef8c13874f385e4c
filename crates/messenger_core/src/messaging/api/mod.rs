//! External-facing APIs of the messenger services.
//!
//! - **Accounts**: user registration and lookup backed by the registry
//! - **Gateway**: front door forwarding account operations, plus sessions
//! - **Mailer**: outgoing emails

pub mod accounts;
pub mod gateway;
pub mod mailer;
pub mod types;

// Re-export all types for convenience
pub use types::*;
