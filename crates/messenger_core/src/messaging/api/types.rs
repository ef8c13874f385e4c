//! Messenger API type definitions.
//!
//! This module defines the request and response types of the three messenger
//! services, independently of their wire representation:
//!
//! ## Accounts API
//! User registration and lookup backed by the in-memory registry, plus the
//! profile maintenance operations.
//!
//! ## Gateway API
//! Front door of the messenger. Forwards every account operation to an accounts
//! stack and adds the session operations (token refresh, logout).
//!
//! ## Mailer API
//! Outgoing email requests, with or without attachments.

/// Sign-up form of a new user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// User created by an operator, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileUpdate {
    /// Identifier of the profile, `0` when unset
    pub id: u64,
    pub username: String,
    pub name: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub name: String,
}

/// Accounts API request types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsRequest {
    /// Register a new user, allocating its identifier.
    Register(Registration),
    Login(Credentials),
    /// Create a user on behalf of an operator, allocating its identifier.
    CreateUser(NewUser),
    GetProfile {
        /// Identifier of the user, `0` when unset
        id: u64,
    },
    GetUser {
        /// Identifier of the user, `0` when unset
        id: u64,
    },
    UpdateProfile(ProfileUpdate),
    DeleteProfile {
        /// Identifier of the user, `0` when unset
        id: u64,
    },
}

/// Accounts API response types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsResponse {
    /// Identifier allocated to a registered user.
    Registered(u64),
    /// Profile of the authenticated user.
    LoggedIn(UserProfile),
    Profile(UserProfile),
    ProfileUpdated { id: u64, username: String },
    /// Human-readable confirmation of the deletion.
    ProfileDeleted(String),
}

/// Gateway API request types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayRequest {
    /// Account operation forwarded to the accounts stack.
    Accounts(AccountsRequest),
    RefreshToken,
    Logout,
}

/// Gateway API response types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    Accounts(AccountsResponse),
    TokenRefreshed,
    /// Human-readable confirmation of the logout.
    LoggedOut(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Email {
    /// Recipient address
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Mailer API request types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailerRequest {
    SendEmail(Email),
    SendEmailWithAttachment { email: Email, attachments: Vec<Attachment> },
}

/// Mailer API response types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailerResponse {
    /// Human-readable confirmation of the delivery.
    Sent(String),
}
