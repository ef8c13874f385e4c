//! Accounts API service implementation.
//!
//! The `AccountsApiService` owns the user registry of a service stack.
//! Registration and user creation allocate a fresh identifier in the registry,
//! lookups read it back. Profile maintenance and login are stubs: they answer
//! with deterministic values and do not touch the registry.
//!
//! Requests are expected to be validated upstream (see
//! [`ValidationLayer`](crate::messaging::validation::ValidationLayer)). The only
//! check performed here is the identifier precondition: an unset identifier
//! (`0`) is rejected with [`ServiceError::MissingField`] before the registry is
//! consulted, so it never yields a not-found error.

use std::{future::Future, pin::Pin, sync::Arc, task::Poll};

use tower::Service;
use tracing::info;

use crate::messaging::{
    api::types::{AccountsRequest, AccountsResponse, UserProfile},
    core::registry::Registry,
    error::ServiceError,
};

/// Profile answered by the login stub.
const DEMO_USER_ID: u64 = 1;
const DEMO_USER_NAME: &str = "John Doe";
const DEMO_USER_USERNAME: &str = "johndoe";

/// Value stored in the accounts registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub name: String,
}

impl Account {
    fn into_profile(self, id: u64) -> UserProfile {
        UserProfile { id, username: self.username, email: self.email, name: self.name }
    }
}

/// Reject the unset identifier.
pub(crate) fn require_id(id: u64) -> Result<u64, ServiceError> {
    if id == 0 { Err(ServiceError::MissingField("id")) } else { Ok(id) }
}

/// Accounts API Service
#[derive(Debug, Clone, Default)]
pub struct AccountsApiService {
    accounts: Arc<Registry<Account>>,
}

impl AccountsApiService {
    /// Creates a new accounts service backed by `accounts`.
    pub fn new(accounts: Arc<Registry<Account>>) -> Self {
        Self { accounts }
    }

    fn register(&self, account: Account) -> u64 {
        self.accounts.insert(account)
    }

    fn lookup(&self, id: u64) -> Result<UserProfile, ServiceError> {
        let id = require_id(id)?;
        self.accounts
            .get(id)
            .map(|account| account.into_profile(id))
            .ok_or(ServiceError::NotFound("user"))
    }
}

impl Service<AccountsRequest> for AccountsApiService {
    type Response = AccountsResponse;
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: AccountsRequest) -> Self::Future {
        let this = self.clone();
        Box::pin(async move {
            match request {
                AccountsRequest::Register(registration) => {
                    info!("[accounts] Register: username: {}", registration.username);
                    let id = this.register(Account {
                        username: registration.username,
                        email: registration.email,
                        name: String::new(),
                    });
                    Ok(AccountsResponse::Registered(id))
                }
                AccountsRequest::Login(credentials) => {
                    info!("[accounts] Login: email: {}", credentials.email);
                    Ok(AccountsResponse::LoggedIn(UserProfile {
                        id: DEMO_USER_ID,
                        username: DEMO_USER_USERNAME.to_string(),
                        email: credentials.email,
                        name: DEMO_USER_NAME.to_string(),
                    }))
                }
                AccountsRequest::CreateUser(user) => {
                    info!("[accounts] CreateUser: username: {}", user.username);
                    let account =
                        Account { username: user.username, email: user.email, name: user.name };
                    let id = this.register(account.clone());
                    Ok(AccountsResponse::Profile(account.into_profile(id)))
                }
                AccountsRequest::GetProfile { id } => {
                    info!("[accounts] GetProfile: id: {id}");
                    this.lookup(id).map(AccountsResponse::Profile)
                }
                AccountsRequest::GetUser { id } => {
                    info!("[accounts] GetUser: id: {id}");
                    this.lookup(id).map(AccountsResponse::Profile)
                }
                AccountsRequest::UpdateProfile(update) => {
                    info!("[accounts] UpdateProfile: id: {}", update.id);
                    let id = require_id(update.id)?;
                    Ok(AccountsResponse::ProfileUpdated { id, username: update.username })
                }
                AccountsRequest::DeleteProfile { id } => {
                    info!("[accounts] DeleteProfile: id: {id}");
                    let id = require_id(id)?;
                    Ok(AccountsResponse::ProfileDeleted(format!("Profile with ID {id} deleted")))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{
        api::types::{NewUser, ProfileUpdate, Registration},
        core::registry::FIRST_ID,
    };

    fn registration(username: &str) -> AccountsRequest {
        AccountsRequest::Register(Registration {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "s3cret!pass".to_string(),
        })
    }

    #[tokio::test]
    async fn unit_accounts_register_then_get() {
        crate::messenger_tracing::init();
        let mut accounts = AccountsApiService::default();

        let AccountsResponse::Registered(id) = accounts.call(registration("alice")).await.unwrap()
        else {
            panic!("Expected AccountsResponse::Registered");
        };
        assert_eq!(id, FIRST_ID);

        assert_eq!(
            accounts.call(AccountsRequest::GetUser { id }).await.unwrap(),
            AccountsResponse::Profile(UserProfile {
                id,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                name: String::new(),
            })
        );
    }

    #[tokio::test]
    async fn unit_accounts_clones_share_registry() {
        crate::messenger_tracing::init();
        let mut accounts = AccountsApiService::default();
        let mut clone = accounts.clone();

        let AccountsResponse::Registered(id) = clone.call(registration("bob")).await.unwrap() else {
            panic!("Expected AccountsResponse::Registered");
        };
        assert!(matches!(
            accounts.call(AccountsRequest::GetProfile { id }).await.unwrap(),
            AccountsResponse::Profile(UserProfile { username, .. }) if username == "bob"
        ));
    }

    #[tokio::test]
    async fn unit_accounts_create_user() {
        crate::messenger_tracing::init();
        let registry = Arc::new(Registry::new());
        let mut accounts = AccountsApiService::new(registry.clone());

        let response = accounts
            .call(AccountsRequest::CreateUser(NewUser {
                username: "carol".to_string(),
                email: "carol@example.com".to_string(),
                name: "Carol".to_string(),
            }))
            .await
            .unwrap();
        let AccountsResponse::Profile(profile) = response else {
            panic!("Expected AccountsResponse::Profile");
        };
        assert_eq!(profile.name, "Carol");
        assert_eq!(
            registry.get(profile.id),
            Some(Account {
                username: "carol".to_string(),
                email: "carol@example.com".to_string(),
                name: "Carol".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn unit_accounts_missing_id_before_lookup() {
        crate::messenger_tracing::init();
        let mut accounts = AccountsApiService::default();

        for request in [
            AccountsRequest::GetUser { id: 0 },
            AccountsRequest::GetProfile { id: 0 },
            AccountsRequest::DeleteProfile { id: 0 },
            AccountsRequest::UpdateProfile(ProfileUpdate::default()),
        ] {
            let error = accounts.call(request).await.unwrap_err();
            assert_eq!(error, ServiceError::MissingField("id"));
            assert_eq!(error.to_string(), "id is required");
        }
    }

    #[tokio::test]
    async fn unit_accounts_unknown_id() {
        crate::messenger_tracing::init();
        let mut accounts = AccountsApiService::default();
        let error = accounts.call(AccountsRequest::GetUser { id: 42 }).await.unwrap_err();
        assert_eq!(error, ServiceError::NotFound("user"));
        assert_eq!(error.to_string(), "user not found");
    }

    #[tokio::test]
    async fn unit_accounts_stubs() {
        crate::messenger_tracing::init();
        let mut accounts = AccountsApiService::default();

        assert_eq!(
            accounts
                .call(AccountsRequest::UpdateProfile(ProfileUpdate {
                    id: 7,
                    username: "dave".to_string(),
                    name: String::new(),
                }))
                .await
                .unwrap(),
            AccountsResponse::ProfileUpdated { id: 7, username: "dave".to_string() }
        );
        assert_eq!(
            accounts.call(AccountsRequest::DeleteProfile { id: 7 }).await.unwrap(),
            AccountsResponse::ProfileDeleted("Profile with ID 7 deleted".to_string())
        );
        // Stubs never touch the registry
        assert_eq!(accounts.accounts.len(), 0);
    }
}
