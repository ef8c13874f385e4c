
use std::{collections::HashSet, sync::Arc};

use fixtures::registration;
use tower::Service;

use crate::messaging::{
    api::{
        accounts::Account,
        types::{AccountsRequest, AccountsResponse, GatewayRequest, GatewayResponse, ProfileUpdate},
    },
    core::registry::{FIRST_ID, Registry},
    error::ServiceError,
    init_accounts, init_accounts_with_registry, init_gateway,
};

#[tokio::test]
async fn integration_concurrent_registrations() {
    crate::messenger_tracing::init();
    let accounts = init_accounts();

    let mut alice_accounts = accounts.clone();
    let alice = tokio::spawn(async move {
        register!(alice_accounts, registration("alice", "alice@example.com", "Passw0rd!"))
    });
    let mut bob_accounts = accounts.clone();
    let bob = tokio::spawn(async move {
        register!(bob_accounts, registration("bob", "bob@example.com", "Passw0rd!"))
    });

    let alice_id = alice.await.unwrap();
    let bob_id = bob.await.unwrap();
    assert_ne!(alice_id, 0);
    assert_ne!(bob_id, 0);
    assert_ne!(alice_id, bob_id);

    let mut accounts = accounts;
    assert_eq!(get_user!(accounts, alice_id).username, "alice");
    assert_eq!(get_user!(accounts, bob_id).username, "bob");
}

#[tokio::test]
async fn integration_invalid_registration_reports_every_field() {
    crate::messenger_tracing::init();
    let registry = Arc::new(Registry::<Account>::new());
    let mut accounts = init_accounts_with_registry(registry.clone());

    let Err(ServiceError::InvalidArgument(violations)) = accounts
        .call(AccountsRequest::Register(registration(
            "ab",
            "not-an-email",
            "longenoughpassword",
        )))
        .await
    else {
        panic!("Expected InvalidArgument");
    };

    assert_eq!(violations.fields(), vec!["username", "email", "password"]);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn integration_unset_id_is_a_precondition() {
    crate::messenger_tracing::init();
    let mut accounts = init_accounts();

    let Err(error) = accounts.call(AccountsRequest::GetUser { id: 0 }).await else {
        panic!("Expected an error");
    };
    assert_eq!(error, ServiceError::MissingField("id"));
    assert_eq!(error.to_string(), "id is required");

    let Err(error) = accounts.call(AccountsRequest::GetUser { id: 42 }).await else {
        panic!("Expected an error");
    };
    assert_eq!(error.to_string(), "user not found");
}

#[tokio::test]
async fn integration_unset_id_survives_validation() {
    crate::messenger_tracing::init();
    let mut accounts = init_accounts();

    let Err(error) = accounts
        .call(AccountsRequest::UpdateProfile(ProfileUpdate {
            id: 0,
            username: "johndoe".to_string(),
            name: "John Doe".to_string(),
        }))
        .await
    else {
        panic!("Expected an error");
    };
    assert_eq!(error, ServiceError::MissingField("id"));
    assert_eq!(error.to_string(), "id is required");

    let mut gateway = init_gateway();
    let Err(error) = gateway
        .call(GatewayRequest::Accounts(AccountsRequest::UpdateProfile(ProfileUpdate {
            id: 0,
            username: "johndoe".to_string(),
            name: String::new(),
        })))
        .await
    else {
        panic!("Expected an error");
    };
    assert_eq!(error, ServiceError::MissingField("id"));
}

#[tokio::test]
async fn integration_shared_registry_across_stacks() {
    crate::messenger_tracing::init();
    let registry = Arc::new(Registry::<Account>::new());
    let mut first = init_accounts_with_registry(registry.clone());
    let mut second = init_accounts_with_registry(registry.clone());

    let id = register!(first, registration("carol", "carol@example.com", "Passw0rd!"));
    assert_eq!(id, FIRST_ID);
    assert_eq!(get_user!(second, id).email, "carol@example.com");
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn integration_gateway_validates_before_forwarding() {
    crate::messenger_tracing::init();
    let mut gateway = init_gateway();

    let Err(ServiceError::InvalidArgument(violations)) = gateway
        .call(GatewayRequest::Accounts(AccountsRequest::Register(registration("", "", ""))))
        .await
    else {
        panic!("Expected InvalidArgument");
    };
    assert_eq!(violations.len(), 3);
    assert!(violations.iter().all(|v| v.message == "value is required"));

    let mut ids = HashSet::new();
    for username in ["dave", "erin"] {
        let Ok(GatewayResponse::Accounts(AccountsResponse::Registered(id))) = gateway
            .call(GatewayRequest::Accounts(AccountsRequest::Register(registration(
                username,
                &format!("{username}@example.com"),
                "Passw0rd!",
            ))))
            .await
        else {
            panic!("Expected Registered");
        };
        ids.insert(id);
    }
    assert_eq!(ids, HashSet::from([FIRST_ID, FIRST_ID + 1]));
}
