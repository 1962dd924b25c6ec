// API-facing error types
pub mod admin;
pub mod auth;
pub mod registry;

#[cfg(test)]
mod auth_test;
#[cfg(test)]
mod registry_test;

// Re-exports for convenience
pub use admin::AdminError;
pub use auth::AuthError;
pub use registry::RegistryApiError;

use crate::errors::internal::{CredentialError, DatabaseError, InternalError, RegistryError};
use crate::types::dto::common::ErrorResponse;

/// Whether internal failure detail may be shown to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorExposure {
    /// Development mode: `detail` carries the internal error text
    Detailed,
    /// Production mode: internal failures get a generic message only
    Redacted,
}

/// Client-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    Conflict,
    InvalidOperation,
    Unauthenticated,
    Forbidden,
    NotFound,
    Internal,
}

impl FailureKind {
    pub fn status_code(&self) -> u16 {
        match self {
            FailureKind::InvalidInput | FailureKind::Conflict | FailureKind::InvalidOperation => 400,
            FailureKind::Unauthenticated => 401,
            FailureKind::Forbidden => 403,
            FailureKind::NotFound => 404,
            FailureKind::Internal => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::Conflict => "conflict",
            FailureKind::InvalidOperation => "invalid_operation",
            FailureKind::Unauthenticated => "unauthorized",
            FailureKind::Forbidden => "forbidden",
            FailureKind::NotFound => "not_found",
            FailureKind::Internal => "internal_error",
        }
    }
}

/// Map an internal error onto the client-facing taxonomy
pub fn classify(err: &InternalError) -> FailureKind {
    match err {
        InternalError::Credential(cred) => match cred {
            CredentialError::MissingToken
            | CredentialError::InvalidToken
            | CredentialError::ExpiredToken => FailureKind::Unauthenticated,
            CredentialError::AdminRequired => FailureKind::Forbidden,
            CredentialError::DuplicateUsername(_) | CredentialError::DuplicateEmail(_) => {
                FailureKind::Conflict
            }
            CredentialError::UserIdNotFound { .. } => FailureKind::NotFound,
            CredentialError::SelfModificationDenied(_) => FailureKind::InvalidOperation,
            CredentialError::InvalidCredentials
            | CredentialError::PasswordTooShort { .. }
            | CredentialError::MissingFields => FailureKind::InvalidInput,
        },
        InternalError::Registry(reg) => match reg {
            RegistryError::Duplicate(_) => FailureKind::Conflict,
            RegistryError::StudentNotFound | RegistryError::CourseNotFound => FailureKind::NotFound,
            RegistryError::MissingFields(_)
            | RegistryError::InvalidField { .. }
            | RegistryError::InvalidCourse
            | RegistryError::EmptyQuery => FailureKind::InvalidInput,
        },
        InternalError::Database(DatabaseError::UniqueViolation { .. }) => FailureKind::Conflict,
        InternalError::Database(_)
        | InternalError::Parse { .. }
        | InternalError::Crypto { .. }
        | InternalError::Media(_) => FailureKind::Internal,
    }
}

/// Build the error body for an internal error, logging it at the matching level
pub(crate) fn error_body(
    err: &InternalError,
    exposure: ErrorExposure,
    area: &str,
) -> (FailureKind, ErrorResponse) {
    let kind = classify(err);
    let message = match (kind, err) {
        (FailureKind::Internal, _) => {
            tracing::error!("Internal error in {} operation: {}", area, err);
            "An internal error occurred".to_string()
        }
        (FailureKind::Conflict, InternalError::Database(_)) => {
            tracing::warn!("Unique constraint rejected {} write: {}", area, err);
            "A record with the same unique value already exists".to_string()
        }
        (FailureKind::Conflict, _) => {
            tracing::warn!("Duplicate rejected in {} operation: {}", area, err);
            err.to_string()
        }
        _ => {
            tracing::debug!("{} operation failed: {}", area, err);
            err.to_string()
        }
    };
    let detail = match (kind, exposure) {
        (FailureKind::Internal, ErrorExposure::Detailed) => Some(err.to_string()),
        _ => None,
    };

    (
        kind,
        ErrorResponse {
            error: kind.error_code().to_string(),
            message,
            status_code: kind.status_code(),
            detail,
        },
    )
}
