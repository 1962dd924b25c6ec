use std::fmt;

use poem_openapi::{ApiResponse, payload::Json};

use crate::errors::internal::InternalError;
use crate::types::dto::common::ErrorResponse;

use super::{ErrorExposure, FailureKind, error_body};

/// User-management error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Self-targeted role change or delete
    #[oai(status = 400)]
    InvalidOperation(Json<ErrorResponse>),

    /// Session token missing, invalid or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Admin role required
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// User not found
    #[oai(status = 404)]
    UserNotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AdminError {
    /// Convert InternalError to AdminError
    ///
    /// Internal error details are logged but only exposed in development mode.
    pub fn from_internal_error(err: InternalError, exposure: ErrorExposure) -> Self {
        let (kind, body) = error_body(&err, exposure, "admin");
        match kind {
            FailureKind::InvalidInput | FailureKind::Conflict | FailureKind::InvalidOperation => {
                AdminError::InvalidOperation(Json(body))
            }
            FailureKind::Unauthenticated => AdminError::Unauthorized(Json(body)),
            FailureKind::Forbidden => AdminError::Forbidden(Json(body)),
            FailureKind::NotFound => AdminError::UserNotFound(Json(body)),
            FailureKind::Internal => AdminError::InternalError(Json(body)),
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AdminError::InvalidOperation(json) => json.0.message.clone(),
            AdminError::Unauthorized(json) => json.0.message.clone(),
            AdminError::Forbidden(json) => json.0.message.clone(),
            AdminError::UserNotFound(json) => json.0.message.clone(),
            AdminError::InternalError(json) => json.0.message.clone(),
        }
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            AdminError::InvalidOperation(json) => json.0.status_code,
            AdminError::Unauthorized(json) => json.0.status_code,
            AdminError::Forbidden(json) => json.0.status_code,
            AdminError::UserNotFound(json) => json.0.status_code,
            AdminError::InternalError(json) => json.0.status_code,
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{CredentialError, SelfAction};

    #[test]
    fn test_self_modification_maps_to_bad_request() {
        let err = AdminError::from_internal_error(
            CredentialError::SelfModificationDenied(SelfAction::ChangeRole).into(),
            ErrorExposure::Redacted,
        );
        assert!(matches!(err, AdminError::InvalidOperation(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Cannot change your own role");
    }

    #[test]
    fn test_unknown_user_maps_to_not_found() {
        let err = AdminError::from_internal_error(
            CredentialError::user_id_not_found("missing").into(),
            ErrorExposure::Redacted,
        );
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "User not found");
    }
}
