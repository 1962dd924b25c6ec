use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::TokenProvider;
use crate::providers::token_provider::IssuedToken;
use crate::stores::CredentialStore;
use crate::types::db::{Role, user};
use crate::types::internal::context::RequestContext;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Coordinates account registration and session issue
pub struct AuthCoordinator {
    credential_store: Arc<CredentialStore>,
    token_provider: Arc<TokenProvider>,
}

/// Trimmed, non-empty value or `None`
fn provided(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            token_provider: app_data.token_provider.clone(),
        }
    }

    /// Register a regular user
    pub async fn register(
        &self,
        ctx: &RequestContext,
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<user::Model, InternalError> {
        self.create_account(ctx, username, email, password, Role::User)
            .await
    }

    /// Create an account with an explicit role
    ///
    /// Registration always yields `user`; the CLI uses this to bootstrap admins.
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        role: Role,
    ) -> Result<user::Model, InternalError> {
        let (Some(username), Some(email), Some(password)) =
            (provided(username), provided(email), password.filter(|p| !p.is_empty()))
        else {
            return Err(CredentialError::MissingFields.into());
        };

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            }
            .into());
        }

        let user = self
            .credential_store
            .add_user(username, email, password, role)
            .await
            .inspect_err(|e| {
                tracing::warn!(request_id = %ctx.request_id, "Registration rejected: {}", e)
            })?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            "Account {} registered as {}",
            user.id,
            user.role
        );
        Ok(user)
    }

    /// Verify credentials and issue a session
    ///
    /// The password is checked before the role so a wrong password never reveals
    /// whether the account is an admin.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<(IssuedToken, user::Model), InternalError> {
        let (Some(email), Some(password)) = (provided(email), password.filter(|p| !p.is_empty()))
        else {
            return Err(CredentialError::MissingFields.into());
        };

        let user = self
            .credential_store
            .verify_credentials(email, password)
            .await
            .inspect_err(|_| {
                tracing::warn!(request_id = %ctx.request_id, "Failed login attempt")
            })?;

        if user.role != Role::Admin {
            tracing::warn!(request_id = %ctx.request_id, "Non-admin {} attempted login", user.id);
            return Err(CredentialError::AdminRequired.into());
        }

        let issued = self.token_provider.issue(&user.id)?;
        tracing::info!(request_id = %ctx.request_id, "User {} logged in", user.id);
        Ok((issued, user))
    }

    /// Cookie value that ends the browser session
    ///
    /// Tokens already handed out stay valid until they expire.
    pub fn logout(&self, ctx: &RequestContext) -> String {
        tracing::info!(request_id = %ctx.request_id, "User {} logged out", ctx.actor_id);
        self.token_provider.clearing_cookie()
    }

    /// Fresh record of the user behind an authorized context
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<user::Model, InternalError> {
        let user_id = ctx.user_id().ok_or(CredentialError::MissingToken)?;
        self.credential_store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CredentialError::user_id_not_found(user_id).into())
    }

    pub fn session_cookie(&self, issued: &IssuedToken) -> String {
        self.token_provider.session_cookie(&issued.token)
    }
}
