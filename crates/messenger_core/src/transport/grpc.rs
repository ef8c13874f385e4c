//! # gRPC Transport Implementation
//!
//! This module exposes the messenger APIs over gRPC with the Tonic framework.
//!
//! ## Components
//!
//! - **AccountsHandler**: server side of `messenger.accounts.AccountsService`
//! - **GatewayHandler**: server side of `messenger.gateway.ApiGatewayService`
//! - **MailerHandler**: server side of `messenger.mailer.MailerService`
//! - **Protocol Buffer Conversions**: type conversions between the internal
//!   API types and their Protocol Buffer representations
//!
//! ## Error Mapping
//!
//! Every [`ServiceError`] is converted into a [`Status`]:
//!
//! - validation failures become `INVALID_ARGUMENT` carrying a
//!   `google.rpc.BadRequest` detail with one field violation per failed field,
//!   in evaluation order;
//! - a missing identifier becomes `INVALID_ARGUMENT` with a plain message;
//! - a registry miss becomes `NOT_FOUND`;
//! - anything else becomes `INTERNAL` with the raw message.
//!
//! Handlers never inspect errors at runtime: the error variant alone decides the
//! status.

use tonic::{Code, Request, Response, Status};
use tonic_types::{ErrorDetails, FieldViolation, StatusExt};
use tower::Service;
use tracing::debug;

/// Default port of the accounts service.
pub const DEFAULT_ACCOUNTS_PORT: u16 = 8081;
/// Default port of the API gateway.
pub const DEFAULT_GATEWAY_PORT: u16 = 8082;
/// Default port of the mailer service.
pub const DEFAULT_MAILER_PORT: u16 = 8084;

/// Request metadata key logged by the accounts service.
const TRACE_HEADER: &str = "x-header";

/// Protocol Buffer definitions and descriptor set of the messenger services.
pub mod proto {
    pub mod users {
        tonic::include_proto!("messenger.users");
    }
    pub mod accounts {
        tonic::include_proto!("messenger.accounts");
    }
    pub mod gateway {
        tonic::include_proto!("messenger.gateway");
    }
    pub mod mailer {
        tonic::include_proto!("messenger.mailer");
    }

    /// Pre-compiled Protocol Buffer descriptor set for service reflection.
    pub const MESSENGER_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("messenger_descriptor");
}

use crate::messaging::{
    api::types::{
        AccountsRequest, AccountsResponse, Attachment, Credentials, Email, GatewayRequest,
        GatewayResponse, MailerRequest, MailerResponse, NewUser, ProfileUpdate, Registration,
        UserProfile,
    },
    error::ServiceError,
};

/// Converts service errors to gRPC Status codes for wire transmission.
impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        let message = error.to_string();
        match error {
            ServiceError::InvalidArgument(violations) => Status::with_error_details(
                Code::InvalidArgument,
                message,
                ErrorDetails::with_bad_request(
                    violations
                        .into_inner()
                        .into_iter()
                        .map(|violation| FieldViolation::new(violation.field, violation.message))
                        .collect::<Vec<_>>(),
                ),
            ),
            ServiceError::MissingField(_) => Status::invalid_argument(message),
            ServiceError::NotFound(_) => Status::not_found(message),
            ServiceError::Internal(message) => Status::internal(message),
        }
    }
}

/// gRPC server handler of the accounts service.
///
/// Translates incoming Protocol Buffer requests to [`AccountsRequest`]s, calls
/// the accounts stack and converts its responses back.
pub struct AccountsHandler<AccountsApi> {
    accounts: AccountsApi,
}

impl<AccountsApi> AccountsHandler<AccountsApi> {
    pub fn new(accounts: AccountsApi) -> Self {
        Self { accounts }
    }
}

impl<AccountsApi> AccountsHandler<AccountsApi>
where
    AccountsApi: Service<AccountsRequest, Response = AccountsResponse, Error = ServiceError>
        + Clone
        + Sync
        + Send
        + 'static,
    AccountsApi::Future: Send,
{
    async fn call(&self, request: AccountsRequest) -> Result<AccountsResponse, Status> {
        let mut accounts = self.accounts.clone();
        Ok(accounts.call(request).await?)
    }
}

#[tonic::async_trait]
impl<AccountsApi> proto::accounts::accounts_service_server::AccountsService
    for AccountsHandler<AccountsApi>
where
    AccountsApi: Service<AccountsRequest, Response = AccountsResponse, Error = ServiceError>
        + Clone
        + Sync
        + Send
        + 'static,
    AccountsApi::Future: Send,
{
    async fn register(
        &self,
        request: Request<proto::users::RegisterRequest>,
    ) -> Result<Response<proto::users::UserRegisterResponse>, Status> {
        if let Some(value) = request.metadata().get(TRACE_HEADER) {
            debug!("[grpc] {TRACE_HEADER}: {value:?}");
        }
        let response = self.call(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn login(
        &self,
        request: Request<proto::users::LoginRequest>,
    ) -> Result<Response<proto::users::UserLoginResponse>, Status> {
        let response = self.call(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn create_user(
        &self,
        request: Request<proto::users::CreateUserRequest>,
    ) -> Result<Response<proto::users::UserProfile>, Status> {
        let response = self.call(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn get_profile(
        &self,
        request: Request<proto::users::GetProfileRequest>,
    ) -> Result<Response<proto::users::UserProfile>, Status> {
        let response = self.call(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn get_user(
        &self,
        request: Request<proto::users::GetUserRequest>,
    ) -> Result<Response<proto::users::UserProfile>, Status> {
        let response = self.call(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn update_profile(
        &self,
        request: Request<proto::users::UpdateProfileRequest>,
    ) -> Result<Response<proto::users::UpdateProfileResponse>, Status> {
        let response = self.call(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn delete_profile(
        &self,
        request: Request<proto::users::DeleteProfileRequest>,
    ) -> Result<Response<proto::users::DeleteProfileResponse>, Status> {
        let response = self.call(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }
}

/// gRPC server handler of the API gateway.
pub struct GatewayHandler<GatewayApi> {
    gateway: GatewayApi,
}

impl<GatewayApi> GatewayHandler<GatewayApi> {
    pub fn new(gateway: GatewayApi) -> Self {
        Self { gateway }
    }
}

impl<GatewayApi> GatewayHandler<GatewayApi>
where
    GatewayApi: Service<GatewayRequest, Response = GatewayResponse, Error = ServiceError>
        + Clone
        + Sync
        + Send
        + 'static,
    GatewayApi::Future: Send,
{
    async fn call(&self, request: GatewayRequest) -> Result<GatewayResponse, Status> {
        let mut gateway = self.gateway.clone();
        Ok(gateway.call(request).await?)
    }

    /// Forward an account operation and unwrap its response.
    async fn forward(&self, request: AccountsRequest) -> Result<AccountsResponse, Status> {
        self.call(GatewayRequest::Accounts(request)).await?.try_into()
    }
}

#[tonic::async_trait]
impl<GatewayApi> proto::gateway::api_gateway_service_server::ApiGatewayService
    for GatewayHandler<GatewayApi>
where
    GatewayApi: Service<GatewayRequest, Response = GatewayResponse, Error = ServiceError>
        + Clone
        + Sync
        + Send
        + 'static,
    GatewayApi::Future: Send,
{
    async fn register(
        &self,
        request: Request<proto::users::RegisterRequest>,
    ) -> Result<Response<proto::users::UserRegisterResponse>, Status> {
        let response = self.forward(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn login(
        &self,
        request: Request<proto::users::LoginRequest>,
    ) -> Result<Response<proto::users::UserLoginResponse>, Status> {
        let response = self.forward(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn refresh_token(
        &self,
        _request: Request<()>,
    ) -> Result<Response<proto::gateway::RefreshTokenResponse>, Status> {
        match self.call(GatewayRequest::RefreshToken).await? {
            GatewayResponse::TokenRefreshed => {
                Ok(Response::new(proto::gateway::RefreshTokenResponse {}))
            }
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }

    async fn logout(
        &self,
        _request: Request<()>,
    ) -> Result<Response<proto::gateway::LogoutResponse>, Status> {
        match self.call(GatewayRequest::Logout).await? {
            GatewayResponse::LoggedOut(message) => {
                Ok(Response::new(proto::gateway::LogoutResponse { message }))
            }
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }

    async fn get_user(
        &self,
        request: Request<proto::users::GetUserRequest>,
    ) -> Result<Response<proto::users::UserProfile>, Status> {
        let response = self.forward(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn get_profile(
        &self,
        request: Request<proto::users::GetProfileRequest>,
    ) -> Result<Response<proto::users::UserProfile>, Status> {
        let response = self.forward(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn update_profile(
        &self,
        request: Request<proto::users::UpdateProfileRequest>,
    ) -> Result<Response<proto::users::UpdateProfileResponse>, Status> {
        let response = self.forward(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }

    async fn delete_profile(
        &self,
        request: Request<proto::users::DeleteProfileRequest>,
    ) -> Result<Response<proto::users::DeleteProfileResponse>, Status> {
        let response = self.forward(request.into_inner().into()).await?;
        Ok(Response::new(response.try_into()?))
    }
}

/// gRPC server handler of the mailer service.
pub struct MailerHandler<MailerApi> {
    mailer: MailerApi,
}

impl<MailerApi> MailerHandler<MailerApi> {
    pub fn new(mailer: MailerApi) -> Self {
        Self { mailer }
    }
}

#[tonic::async_trait]
impl<MailerApi> proto::mailer::mailer_service_server::MailerService for MailerHandler<MailerApi>
where
    MailerApi: Service<MailerRequest, Response = MailerResponse, Error = ServiceError>
        + Clone
        + Sync
        + Send
        + 'static,
    MailerApi::Future: Send,
{
    async fn send_email(
        &self,
        request: Request<proto::mailer::SendEmailRequest>,
    ) -> Result<Response<proto::mailer::SendEmailResponse>, Status> {
        let mut mailer = self.mailer.clone();
        let response = mailer.call(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }

    async fn send_email_with_attachment(
        &self,
        request: Request<proto::mailer::SendEmailWithAttachmentRequest>,
    ) -> Result<Response<proto::mailer::SendEmailResponse>, Status> {
        let mut mailer = self.mailer.clone();
        let response = mailer.call(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }
}

// Conversion trait implementations

impl From<proto::users::RegisterRequest> for AccountsRequest {
    fn from(req: proto::users::RegisterRequest) -> Self {
        AccountsRequest::Register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
        })
    }
}

impl From<proto::users::LoginRequest> for AccountsRequest {
    fn from(req: proto::users::LoginRequest) -> Self {
        AccountsRequest::Login(Credentials { email: req.email, password: req.password })
    }
}

impl From<proto::users::CreateUserRequest> for AccountsRequest {
    fn from(req: proto::users::CreateUserRequest) -> Self {
        AccountsRequest::CreateUser(NewUser {
            username: req.username,
            email: req.email,
            name: req.name,
        })
    }
}

impl From<proto::users::GetProfileRequest> for AccountsRequest {
    fn from(req: proto::users::GetProfileRequest) -> Self {
        AccountsRequest::GetProfile { id: req.id }
    }
}

impl From<proto::users::GetUserRequest> for AccountsRequest {
    fn from(req: proto::users::GetUserRequest) -> Self {
        AccountsRequest::GetUser { id: req.id }
    }
}

impl From<proto::users::UpdateProfileRequest> for AccountsRequest {
    fn from(req: proto::users::UpdateProfileRequest) -> Self {
        AccountsRequest::UpdateProfile(ProfileUpdate {
            id: req.id,
            username: req.username,
            name: req.name,
        })
    }
}

impl From<proto::users::DeleteProfileRequest> for AccountsRequest {
    fn from(req: proto::users::DeleteProfileRequest) -> Self {
        AccountsRequest::DeleteProfile { id: req.id }
    }
}

impl From<UserProfile> for proto::users::UserProfile {
    fn from(profile: UserProfile) -> Self {
        proto::users::UserProfile {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            name: profile.name,
        }
    }
}

impl TryFrom<GatewayResponse> for AccountsResponse {
    type Error = Status;

    fn try_from(response: GatewayResponse) -> Result<Self, Self::Error> {
        match response {
            GatewayResponse::Accounts(response) => Ok(response),
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }
}

impl TryFrom<AccountsResponse> for proto::users::UserRegisterResponse {
    type Error = Status;

    fn try_from(response: AccountsResponse) -> Result<Self, Self::Error> {
        match response {
            AccountsResponse::Registered(id) => Ok(proto::users::UserRegisterResponse { id }),
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }
}

impl TryFrom<AccountsResponse> for proto::users::UserLoginResponse {
    type Error = Status;

    fn try_from(response: AccountsResponse) -> Result<Self, Self::Error> {
        match response {
            AccountsResponse::LoggedIn(profile) => Ok(proto::users::UserLoginResponse {
                id: profile.id,
                email: profile.email,
                name: profile.name,
                username: profile.username,
            }),
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }
}

impl TryFrom<AccountsResponse> for proto::users::UserProfile {
    type Error = Status;

    fn try_from(response: AccountsResponse) -> Result<Self, Self::Error> {
        match response {
            AccountsResponse::Profile(profile) => Ok(profile.into()),
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }
}

impl TryFrom<AccountsResponse> for proto::users::UpdateProfileResponse {
    type Error = Status;

    fn try_from(response: AccountsResponse) -> Result<Self, Self::Error> {
        match response {
            AccountsResponse::ProfileUpdated { id, username } => {
                Ok(proto::users::UpdateProfileResponse { id, username })
            }
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }
}

impl TryFrom<AccountsResponse> for proto::users::DeleteProfileResponse {
    type Error = Status;

    fn try_from(response: AccountsResponse) -> Result<Self, Self::Error> {
        match response {
            AccountsResponse::ProfileDeleted(message) => {
                Ok(proto::users::DeleteProfileResponse { message })
            }
            _ => Err(ServiceError::unexpected_response().into()),
        }
    }
}

impl From<proto::mailer::SendEmailRequest> for MailerRequest {
    fn from(req: proto::mailer::SendEmailRequest) -> Self {
        MailerRequest::SendEmail(Email { to: req.to, subject: req.subject, body: req.body })
    }
}

impl From<proto::mailer::SendEmailWithAttachmentRequest> for MailerRequest {
    fn from(req: proto::mailer::SendEmailWithAttachmentRequest) -> Self {
        MailerRequest::SendEmailWithAttachment {
            email: Email { to: req.to, subject: req.subject, body: req.body },
            attachments: req.attachments.into_iter().map(|a| a.into()).collect(),
        }
    }
}

impl From<proto::mailer::Attachment> for Attachment {
    fn from(attachment: proto::mailer::Attachment) -> Self {
        Attachment { filename: attachment.filename, content: attachment.content }
    }
}

impl From<MailerResponse> for proto::mailer::SendEmailResponse {
    fn from(response: MailerResponse) -> Self {
        match response {
            MailerResponse::Sent(message) => proto::mailer::SendEmailResponse { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::validation::{Violation, Violations};

    #[test]
    fn unit_grpc_status_from_violations() {
        let violations = Violations::new(vec![
            Violation::new("username", "value length must be at least 3 characters"),
            Violation::new("email", "value must be a valid email address"),
        ])
        .unwrap();
        let status = Status::from(ServiceError::InvalidArgument(violations));

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "invalid argument");
        let bad_request = status.get_details_bad_request().unwrap();
        assert_eq!(
            bad_request
                .field_violations
                .iter()
                .map(|v| (v.field.as_str(), v.description.as_str()))
                .collect::<Vec<_>>(),
            vec![
                ("username", "value length must be at least 3 characters"),
                ("email", "value must be a valid email address"),
            ]
        );
    }

    #[test]
    fn unit_grpc_status_from_other_errors() {
        let status = Status::from(ServiceError::MissingField("id"));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "id is required");
        assert!(status.get_details_bad_request().is_none());

        let status = Status::from(ServiceError::NotFound("user"));
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "user not found");

        let status = Status::from(ServiceError::Internal("boom".to_string()));
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "boom");
    }

    #[test]
    fn unit_grpc_unexpected_response() {
        let status =
            proto::users::UserRegisterResponse::try_from(AccountsResponse::ProfileDeleted(
                String::new(),
            ))
            .unwrap_err();
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "internal messenger API error");
    }
}
