use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, SelfAction};
use crate::stores::CredentialStore;
use crate::types::db::{Role, user};
use crate::types::internal::context::RequestContext;

/// Coordinates admin-side user management
pub struct UserCoordinator {
    credential_store: Arc<CredentialStore>,
}

/// Admins may not change their own role or delete themselves
fn guard_self(ctx: &RequestContext, target_user_id: &str, action: SelfAction) -> Result<(), InternalError> {
    if ctx.user_id() == Some(target_user_id) {
        tracing::warn!(request_id = %ctx.request_id, "Refused self action: {}", action);
        return Err(CredentialError::SelfModificationDenied(action).into());
    }
    Ok(())
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
        }
    }

    pub async fn list_users(&self, _ctx: &RequestContext) -> Result<Vec<user::Model>, InternalError> {
        self.credential_store.list_users().await
    }

    /// Flip a user between `admin` and `user`
    pub async fn toggle_role(
        &self,
        ctx: &RequestContext,
        target_user_id: &str,
    ) -> Result<user::Model, InternalError> {
        let target = self
            .credential_store
            .find_by_id(target_user_id)
            .await?
            .ok_or_else(|| CredentialError::user_id_not_found(target_user_id))?;

        guard_self(ctx, target_user_id, SelfAction::ChangeRole)?;

        let updated = self
            .credential_store
            .set_role(&target.id, target.role.toggled())
            .await?;

        tracing::info!(
            request_id = %ctx.request_id,
            "Role of {} changed to {} by {}",
            updated.id,
            updated.role,
            ctx.actor_id
        );
        Ok(updated)
    }

    pub async fn delete_user(&self, ctx: &RequestContext, target_user_id: &str) -> Result<(), InternalError> {
        guard_self(ctx, target_user_id, SelfAction::Delete)?;
        self.credential_store.delete_user(target_user_id).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            "User {} deleted by {}",
            target_user_id,
            ctx.actor_id
        );
        Ok(())
    }

    /// Grant the admin role to the account registered under `email`
    pub async fn promote_by_email(&self, ctx: &RequestContext, email: &str) -> Result<user::Model, InternalError> {
        let email = email.trim().to_lowercase();
        let user = self
            .credential_store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| CredentialError::user_id_not_found(email.clone()))?;

        if user.role == Role::Admin {
            tracing::info!(request_id = %ctx.request_id, "User {} is already an admin", user.id);
            return Ok(user);
        }

        let promoted = self.credential_store.set_role(&user.id, Role::Admin).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %ctx.actor_id, "User {} promoted to admin", promoted.id);
        Ok(promoted)
    }
}
