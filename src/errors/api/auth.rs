use std::fmt;

use poem_openapi::{ApiResponse, payload::Json};

use crate::errors::internal::InternalError;
use crate::types::dto::common::ErrorResponse;

use super::{ErrorExposure, FailureKind, error_body};

/// Authentication and session error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Missing fields, short password, duplicate account or bad credentials
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Session token missing, invalid or expired
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated but not an admin
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Token subject no longer exists
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    pub fn from_internal_error(err: InternalError, exposure: ErrorExposure) -> Self {
        let (kind, body) = error_body(&err, exposure, "auth");
        match kind {
            FailureKind::InvalidInput | FailureKind::Conflict | FailureKind::InvalidOperation => {
                AuthError::BadRequest(Json(body))
            }
            FailureKind::Unauthenticated => AuthError::Unauthorized(Json(body)),
            FailureKind::Forbidden => AuthError::Forbidden(Json(body)),
            FailureKind::NotFound => AuthError::NotFound(Json(body)),
            FailureKind::Internal => AuthError::InternalError(Json(body)),
        }
    }

    fn body(&self) -> &ErrorResponse {
        match self {
            AuthError::BadRequest(json)
            | AuthError::Unauthorized(json)
            | AuthError::Forbidden(json)
            | AuthError::NotFound(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
