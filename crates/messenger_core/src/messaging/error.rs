use thiserror::Error;

use crate::messaging::validation::Violations;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// One or more field rules failed, the full ordered list is attached.
    #[error("invalid argument")]
    InvalidArgument(Violations),

    /// A required field was left unset. Raised before any registry access.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub(crate) fn unexpected_response() -> Self {
        Self::Internal("internal messenger API error".to_string())
    }
}

impl From<Violations> for ServiceError {
    fn from(violations: Violations) -> Self {
        Self::InvalidArgument(violations)
    }
}
