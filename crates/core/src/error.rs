//! Domain error model.
//!
//! Every core operation resolves to either a payload or one of these typed
//! outcomes. Transport layers map [`ErrorKind`] to their own status codes.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Business-rule failures carry a stable, human-readable reason. `Internal`
/// carries a diagnostic detail that is logged but never shown to callers
/// (see [`DomainError::public_message`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No credential, or the credential could not be verified.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Valid credential, insufficient role or wrong owner.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A referenced entity is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// State or uniqueness violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Malformed input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Store unavailable or unexpected fault.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Outcome kind, stable across releases.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Internal => "internal_error",
        }
    }
}

impl DomainError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Unauthenticated => ErrorKind::Unauthenticated,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Conflict(_) => ErrorKind::Conflict,
            DomainError::Validation(_) | DomainError::InvalidId(_) => ErrorKind::Validation,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            DomainError::Unauthenticated => "User is not authenticated".to_string(),
            DomainError::Forbidden(msg)
            | DomainError::NotFound(msg)
            | DomainError::Conflict(msg)
            | DomainError::Validation(msg)
            | DomainError::InvalidId(msg) => msg.clone(),
            DomainError::Internal(_) => "internal error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_detail_is_never_public() {
        let err = DomainError::internal("connection refused: 10.0.0.3:5432");
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), "internal error");
    }

    #[test]
    fn invalid_id_is_a_validation_outcome() {
        let err = DomainError::invalid_id("JobId: bad");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.kind().as_str(), "validation_error");
    }

    #[test]
    fn business_reasons_pass_through() {
        let err = DomainError::conflict("You have already liked this job");
        assert_eq!(err.public_message(), "You have already liked this job");
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
