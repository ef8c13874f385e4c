//! Messenger servers - shared bootstrap
//!
//! Logging setup and the serve loop shared by the `accounts`, `api-gateway` and
//! `mailer` binaries.

pub mod logging;
pub mod server;
