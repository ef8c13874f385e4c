//! Gateway API service implementation.
//!
//! The gateway is the front door of the messenger. Account operations are
//! forwarded unchanged to an accounts service, session operations are answered
//! locally.

use std::{future::Future, pin::Pin, task::Poll};

use tower::Service;
use tracing::info;

use crate::messaging::{
    api::types::{AccountsRequest, AccountsResponse, GatewayRequest, GatewayResponse},
    error::ServiceError,
};

/// Gateway API Service
///
/// Generic over the accounts service `A` so that the gateway can be stacked on
/// any accounts implementation.
#[derive(Debug, Clone)]
pub struct GatewayApiService<A> {
    accounts: A,
}

impl<A> GatewayApiService<A> {
    pub fn new(accounts: A) -> Self {
        Self { accounts }
    }
}

impl<A> Service<GatewayRequest> for GatewayApiService<A>
where
    A: Service<AccountsRequest, Response = AccountsResponse, Error = ServiceError>
        + Clone
        + Send
        + 'static,
    A::Future: Send,
{
    type Response = GatewayResponse;
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: GatewayRequest) -> Self::Future {
        let mut accounts = self.accounts.clone();
        Box::pin(async move {
            match request {
                GatewayRequest::Accounts(request) => {
                    accounts.call(request).await.map(GatewayResponse::Accounts)
                }
                GatewayRequest::RefreshToken => {
                    info!("[gateway] RefreshToken");
                    Ok(GatewayResponse::TokenRefreshed)
                }
                GatewayRequest::Logout => {
                    info!("[gateway] Logout");
                    Ok(GatewayResponse::LoggedOut("Logged out".to_string()))
                }
            }
        })
    }
}
