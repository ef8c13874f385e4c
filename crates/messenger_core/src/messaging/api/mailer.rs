//! Mailer API service implementation.
//!
//! Delivery itself is out of the scope of this service: accepted emails are
//! logged and acknowledged.

use std::{future::Future, pin::Pin, task::Poll};

use tower::Service;
use tracing::info;

use crate::messaging::{
    api::types::{MailerRequest, MailerResponse},
    error::ServiceError,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct MailerApiService;

impl Service<MailerRequest> for MailerApiService {
    type Response = MailerResponse;
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: MailerRequest) -> Self::Future {
        Box::pin(async move {
            match request {
                MailerRequest::SendEmail(email) => {
                    info!("[mailer] SendEmail: to: {}, subject: {}", email.to, email.subject);
                    Ok(MailerResponse::Sent("Email sent successfully".to_string()))
                }
                MailerRequest::SendEmailWithAttachment { email, attachments } => {
                    info!(
                        "[mailer] SendEmailWithAttachment: to: {}, subject: {}, attachments: {}",
                        email.to,
                        email.subject,
                        attachments.len()
                    );
                    Ok(MailerResponse::Sent("Email with attachment sent successfully".to_string()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::api::types::{Attachment, Email};

    #[tokio::test]
    async fn unit_mailer_acknowledges() {
        crate::messenger_tracing::init();
        let mut mailer = MailerApiService;
        let email = Email {
            to: "john@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "Hi John".to_string(),
        };

        assert_eq!(
            mailer.call(MailerRequest::SendEmail(email.clone())).await.unwrap(),
            MailerResponse::Sent("Email sent successfully".to_string())
        );
        assert_eq!(
            mailer
                .call(MailerRequest::SendEmailWithAttachment {
                    email,
                    attachments: vec![Attachment {
                        filename: "notes.txt".to_string(),
                        content: b"notes".to_vec(),
                    }],
                })
                .await
                .unwrap(),
            MailerResponse::Sent("Email with attachment sent successfully".to_string())
        );
    }
}
