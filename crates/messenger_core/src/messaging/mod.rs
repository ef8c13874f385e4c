//! Messaging module.
//!
//! This module holds everything the messenger services have in common, independently
//! of the transport used to expose them.
//!
//! ## Core Architecture
//!
//! ### Accounts API
//! User registration and lookup. Every registered user receives a unique
//! identifier allocated by the accounts registry.
//!
//! ### Gateway API
//! Front door of the messenger, forwarding account operations to an accounts
//! stack and answering session operations.
//!
//! ### Mailer API
//! Outgoing emails, with or without attachments.
//!
//! ## Shared Components
//!
//! - **Registry**: concurrency-safe identifier allocation and lookup
//! - **Validation**: declarative rule tables rejecting malformed requests with
//!   every field violation at once
//! - **Error Handling**: a single error type mapped to RPC statuses by the transport
//!
//! ## Default Service Stacks
//!
//! Every API is stacked behind the validation layer:
//! - `AccountsApiDefaultStack`
//! - `GatewayApiDefaultStack`
//! - `MailerApiDefaultStack`
pub mod api;
pub mod core;
pub mod error;
pub mod validation;

use std::sync::Arc;

use crate::messaging::{
    api::{
        accounts::{Account, AccountsApiService},
        gateway::GatewayApiService,
        mailer::MailerApiService,
    },
    core::registry::Registry,
    validation::{ValidationLayer, ValidationService},
};

/// Validated accounts service.
pub type AccountsApiDefaultStack = ValidationService<AccountsApiService>;

/// Validated gateway service, backed by an in-process accounts service.
///
/// Validation happens once, at the gateway level.
pub type GatewayApiDefaultStack = ValidationService<GatewayApiService<AccountsApiService>>;

/// Validated mailer service.
pub type MailerApiDefaultStack = ValidationService<MailerApiService>;

/// Initialize an accounts stack with an empty registry.
pub fn init_accounts() -> AccountsApiDefaultStack {
    init_accounts_with_registry(Arc::new(Registry::new()))
}

/// Initialize an accounts stack backed by `registry`.
///
/// Every clone of the returned stack shares the same registry.
pub fn init_accounts_with_registry(registry: Arc<Registry<Account>>) -> AccountsApiDefaultStack {
    tower::ServiceBuilder::new().layer(ValidationLayer).service(AccountsApiService::new(registry))
}

/// Initialize a gateway stack owning its own accounts registry.
pub fn init_gateway() -> GatewayApiDefaultStack {
    tower::ServiceBuilder::new()
        .layer(ValidationLayer)
        .service(GatewayApiService::new(AccountsApiService::default()))
}

pub fn init_mailer() -> MailerApiDefaultStack {
    tower::ServiceBuilder::new().layer(ValidationLayer).service(MailerApiService)
}
