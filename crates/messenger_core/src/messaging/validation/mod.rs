//! Request validation pipeline.
//!
//! Requests are checked against declarative rule tables (see [`rules`]) before
//! they reach the API services. A request is either forwarded unchanged or
//! rejected with the complete, ordered list of [`Violation`]s, so that a client
//! can fix every offending field in a single round trip.
//!
//! ## Integration
//!
//! The pipeline is a [`tower::Layer`]: [`ValidationLayer`] wraps any API service
//! whose request type implements [`Validate`]. Rejected requests never reach the
//! wrapped service and surface as [`ServiceError::InvalidArgument`], the only
//! error shape this module produces.

use std::{fmt, future::Future, pin::Pin, task::Poll};

use tower::{Layer, Service};
use tracing::warn;

use crate::messaging::error::ServiceError;

pub mod requests;
pub mod rules;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path of the offending field, e.g. `username` or `attachments[0].filename`
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered, non-empty list of violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Returns `None` when there is nothing to report.
    pub fn new(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() { None } else { Some(Self(violations)) }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A constructed list is never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the offending fields, in evaluation order.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Requests checked by the validation pipeline.
pub trait Validate {
    /// Every violation of the request, in rule-table order.
    fn violations(&self) -> Vec<Violation>;

    /// Forward the request unchanged, or reject it with all its violations.
    fn validate(self) -> Result<Self, Violations>
    where
        Self: Sized,
    {
        match Violations::new(self.violations()) {
            Some(violations) => Err(violations),
            None => Ok(self),
        }
    }
}

/// Layer validating requests before they reach the wrapped service.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationLayer;

impl<S> Layer<S> for ValidationLayer {
    type Service = ValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidationService::new(inner)
    }
}

/// Service rejecting invalid requests with [`ServiceError::InvalidArgument`].
#[derive(Debug, Clone)]
pub struct ValidationService<S> {
    inner: S,
}

impl<S> ValidationService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, R> Service<R> for ValidationService<S>
where
    R: Validate + Send + 'static,
    S: Service<R, Error = ServiceError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: R) -> Self::Future {
        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            match request.validate() {
                Ok(request) => inner.call(request).await,
                Err(violations) => {
                    warn!("[validation] rejected request: {violations}");
                    Err(ServiceError::InvalidArgument(violations))
                }
            }
        })
    }
}
