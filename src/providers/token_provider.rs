use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use poem::web::cookie::{Cookie, SameSite};

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::auth::Claims;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "jwt";

/// Sessions last seven days; there is no revocation
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// A freshly signed session token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Issues and validates signed session tokens
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    ttl_seconds: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self {
            secret_manager,
            ttl_seconds: SESSION_TTL_SECONDS,
        }
    }

    /// Sign a session token for `user_id`
    pub fn issue(&self, user_id: &str) -> Result<IssuedToken, InternalError> {
        let now = Utc::now().timestamp();
        self.issue_at(user_id, now)
    }

    fn issue_at(&self, user_id: &str, now: i64) -> Result<IssuedToken, InternalError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.ttl_seconds,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        tracing::debug!("Issued session token for user {}", user_id);

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    /// Validate signature and expiry, returning the claims
    pub fn validate(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            let err = match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::ExpiredToken,
                _ => CredentialError::InvalidToken,
            };
            tracing::debug!("Session token rejected: {}", e);
            InternalError::from(err)
        })
    }

    /// `Set-Cookie` value carrying the session token
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = Cookie::new_with_str(SESSION_COOKIE, token);
        cookie.set_http_only(true);
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::None);
        cookie.set_path("/");
        cookie.set_max_age(std::time::Duration::from_secs(self.ttl_seconds as u64));
        cookie.to_string()
    }

    /// `Set-Cookie` value that makes the client drop the session cookie
    pub fn clearing_cookie(&self) -> String {
        let mut cookie = Cookie::new_with_str(SESSION_COOKIE, "");
        cookie.set_http_only(true);
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::None);
        cookie.set_path("/");
        cookie.set_max_age(std::time::Duration::ZERO);
        cookie.to_string()
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(secret: &str) -> TokenProvider {
        let secrets = SecretManager::from_values(secret, "test-pepper-16chars").unwrap();
        TokenProvider::new(Arc::new(secrets))
    }

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    #[test]
    fn test_issued_token_validates_and_lasts_seven_days() {
        let provider = provider(SECRET);
        let issued = provider.issue("user-123").unwrap();

        let claims = provider.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
        assert_eq!(issued.expires_at, claims.exp);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let issuer = provider("attacker-secret-key-minimum-32-characters");
        let token = issuer.issue("user-123").unwrap().token;

        let err = provider(SECRET).validate(&token).unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let provider = provider(SECRET);
        let long_ago = Utc::now().timestamp() - SESSION_TTL_SECONDS - 3600;
        let token = provider.issue_at("user-123", long_ago).unwrap().token;

        let err = provider.validate(&token).unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::ExpiredToken)
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let err = provider(SECRET).validate("not.a.jwt").unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::InvalidToken)
        ));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = provider(SECRET).session_cookie("abc");
        assert!(cookie.starts_with("jwt=abc"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn test_clearing_cookie_expires_immediately() {
        let cookie = provider(SECRET).clearing_cookie();
        assert!(cookie.starts_with("jwt="));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let output = format!("{:?}", provider(SECRET));
        assert!(!output.contains(SECRET));
    }
}
