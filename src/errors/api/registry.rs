use std::fmt;

use poem_openapi::{ApiResponse, payload::Json};

use crate::errors::internal::InternalError;
use crate::types::dto::common::ErrorResponse;

use super::{ErrorExposure, FailureKind, error_body};

/// Course and student registry error types
#[derive(ApiResponse, Debug)]
pub enum RegistryApiError {
    /// Missing or malformed fields, or a duplicate unique value
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Session token missing, invalid or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Admin role required
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Record not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl RegistryApiError {
    /// Convert InternalError to RegistryApiError
    pub fn from_internal_error(err: InternalError, exposure: ErrorExposure) -> Self {
        let (kind, body) = error_body(&err, exposure, "registry");
        match kind {
            FailureKind::InvalidInput | FailureKind::Conflict | FailureKind::InvalidOperation => {
                RegistryApiError::BadRequest(Json(body))
            }
            FailureKind::Unauthenticated => RegistryApiError::Unauthorized(Json(body)),
            FailureKind::Forbidden => RegistryApiError::Forbidden(Json(body)),
            FailureKind::NotFound => RegistryApiError::NotFound(Json(body)),
            FailureKind::Internal => RegistryApiError::InternalError(Json(body)),
        }
    }

    /// Not-found with a caller-chosen message
    pub fn not_found(message: impl Into<String>) -> Self {
        RegistryApiError::NotFound(Json(ErrorResponse {
            error: FailureKind::NotFound.error_code().to_string(),
            message: message.into(),
            status_code: 404,
            detail: None,
        }))
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            RegistryApiError::BadRequest(json)
            | RegistryApiError::Unauthorized(json)
            | RegistryApiError::Forbidden(json)
            | RegistryApiError::NotFound(json)
            | RegistryApiError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }

    pub fn detail(&self) -> Option<String> {
        self.body().detail.clone()
    }
}

impl fmt::Display for RegistryApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
