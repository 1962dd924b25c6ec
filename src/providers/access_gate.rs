use std::sync::Arc;

use poem::Request;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::token_provider::TokenProvider;
use crate::stores::CredentialStore;
use crate::types::internal::RequestContext;
use crate::types::internal::auth::AuthenticatedUser;

/// What an operation demands of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any valid session
    Session,
    /// A valid session whose user has the admin role
    Admin,
}

/// Guards protected operations: locate token, validate it, resolve the user, check role
pub struct AccessGate {
    token_provider: Arc<TokenProvider>,
    credential_store: Arc<CredentialStore>,
}

impl AccessGate {
    pub fn new(token_provider: Arc<TokenProvider>, credential_store: Arc<CredentialStore>) -> Self {
        Self {
            token_provider,
            credential_store,
        }
    }

    /// Authorize an HTTP request and return its context with the resolved identity attached
    ///
    /// `token` is whatever the request's security scheme extracted (cookie, then bearer header).
    pub async fn authorize(
        &self,
        req: &Request,
        token: Option<&str>,
        requirement: Requirement,
    ) -> Result<RequestContext, InternalError> {
        let ctx = RequestContext::for_request(req);
        let user = self.authorize_token(token, requirement).await?;
        tracing::debug!(
            request_id = %ctx.request_id,
            "Access granted to {} ({:?})",
            user.id,
            requirement
        );
        Ok(ctx.with_user(user))
    }

    /// Gate decision for an already-extracted token
    pub async fn authorize_token(
        &self,
        token: Option<&str>,
        requirement: Requirement,
    ) -> Result<AuthenticatedUser, InternalError> {
        let token = token.ok_or(CredentialError::MissingToken)?;
        let claims = self.token_provider.validate(token)?;

        let user = self
            .credential_store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| CredentialError::user_id_not_found(&claims.sub))?;
        let user = AuthenticatedUser::from(&user);

        if requirement == Requirement::Admin && !user.is_admin() {
            tracing::debug!("User {} denied: admin role required", user.id);
            return Err(CredentialError::AdminRequired.into());
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretManager;
    use crate::types::db::Role;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_gate() -> (AccessGate, Arc<CredentialStore>, Arc<TokenProvider>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let secrets = Arc::new(
            SecretManager::from_values(
                "test-secret-key-minimum-32-characters-long",
                "test-pepper-for-unit-tests",
            )
            .unwrap(),
        );
        let store = Arc::new(CredentialStore::new(
            db,
            secrets.password_pepper().to_string(),
        ));
        let tokens = Arc::new(TokenProvider::new(secrets));
        (AccessGate::new(tokens.clone(), store.clone()), store, tokens)
    }

    #[tokio::test]
    async fn test_authorize_attaches_user_to_context() {
        let (gate, store, tokens) = setup_gate().await;
        let admin = store
            .add_user("root", "root@example.com", "secret123", Role::Admin)
            .await
            .unwrap();
        let token = tokens.issue(&admin.id).unwrap().token;
        let req = Request::builder().finish();

        let ctx = gate
            .authorize(&req, Some(&token), Requirement::Admin)
            .await
            .unwrap();
        assert_eq!(ctx.actor_id, admin.id);
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let (gate, _, _) = setup_gate().await;
        let err = gate.authorize_token(None, Requirement::Session).await.unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::MissingToken)));
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_not_found() {
        let (gate, _, tokens) = setup_gate().await;
        let token = tokens.issue("ghost-user").unwrap().token;

        let err = gate
            .authorize_token(Some(&token), Requirement::Session)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InternalError::Credential(CredentialError::UserIdNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_admin_requirement() {
        let (gate, store, tokens) = setup_gate().await;
        let user = store
            .add_user("plain", "plain@example.com", "secret123", Role::User)
            .await
            .unwrap();
        let token = tokens.issue(&user.id).unwrap().token;

        let session = gate
            .authorize_token(Some(&token), Requirement::Session)
            .await
            .unwrap();
        assert_eq!(session.id, user.id);

        let err = gate
            .authorize_token(Some(&token), Requirement::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Credential(CredentialError::AdminRequired)));
    }
}
