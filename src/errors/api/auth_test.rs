#[cfg(test)]
mod tests {
    use crate::errors::AuthError;
    use crate::errors::api::{ErrorExposure, FailureKind, classify};
    use crate::errors::internal::{CredentialError, InternalError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let internal_err = InternalError::database("get_user", db_err);
        let auth_err = AuthError::from_internal_error(internal_err, ErrorExposure::Redacted);

        assert_eq!(auth_err.message(), "An internal error occurred");
        assert_eq!(auth_err.status_code(), 500);
    }

    #[test]
    fn test_crypto_error_converts_to_internal_server_error() {
        let internal_err = InternalError::crypto("argon2_init", "invalid secret");
        let auth_err = AuthError::from_internal_error(internal_err, ErrorExposure::Redacted);

        assert_eq!(auth_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_detail_only_exposed_in_development() {
        let redacted = AuthError::from_internal_error(
            InternalError::parse("UUID", "invalid format"),
            ErrorExposure::Redacted,
        );
        let detailed = AuthError::from_internal_error(
            InternalError::parse("UUID", "invalid format"),
            ErrorExposure::Detailed,
        );

        match (redacted, detailed) {
            (AuthError::InternalError(r), AuthError::InternalError(d)) => {
                assert!(r.0.detail.is_none());
                assert_eq!(
                    d.0.detail.as_deref(),
                    Some("Parse error: failed to parse UUID: invalid format")
                );
            }
            other => panic!("expected internal errors, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_credentials_is_bad_request() {
        let auth_err = AuthError::from_internal_error(
            CredentialError::InvalidCredentials.into(),
            ErrorExposure::Redacted,
        );

        assert!(matches!(auth_err, AuthError::BadRequest(_)));
        assert_eq!(auth_err.message(), "Invalid credentials");
    }

    #[test]
    fn test_duplicate_email_converts_correctly() {
        let auth_err = AuthError::from_internal_error(
            CredentialError::DuplicateEmail("a@b.c".to_string()).into(),
            ErrorExposure::Redacted,
        );

        assert_eq!(auth_err.status_code(), 400);
        assert_eq!(auth_err.message(), "Email already exists");
    }

    #[test]
    fn test_token_errors_are_unauthenticated() {
        for err in [
            CredentialError::MissingToken,
            CredentialError::InvalidToken,
            CredentialError::ExpiredToken,
        ] {
            assert_eq!(classify(&err.into()), FailureKind::Unauthenticated);
        }
    }

    #[test]
    fn test_admin_required_is_forbidden() {
        let auth_err = AuthError::from_internal_error(
            CredentialError::AdminRequired.into(),
            ErrorExposure::Redacted,
        );

        assert!(matches!(auth_err, AuthError::Forbidden(_)));
        assert_eq!(auth_err.message(), "Admin access only");
    }
}
