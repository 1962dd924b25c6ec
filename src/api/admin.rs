use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, param::Path, payload::Json};

use crate::app_data::AppData;
use crate::coordinators::UserCoordinator;
use crate::errors::api::ErrorExposure;
use crate::errors::{AdminError, InternalError};
use crate::providers::{AccessGate, Requirement};
use crate::types::dto::admin::{UserActionResponse, UserListResponse};
use crate::types::dto::auth::UserSummary;
use crate::types::dto::common::MessageResponse;
use crate::types::internal::context::RequestContext;

use super::auth::SessionAuth;

/// Admin user management endpoints
pub struct AdminApi {
    user_coordinator: Arc<UserCoordinator>,
    access_gate: Arc<AccessGate>,
    error_exposure: ErrorExposure,
}

impl AdminApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            access_gate: app_data.access_gate.clone(),
            error_exposure: app_data.error_exposure,
            user_coordinator: Arc::new(UserCoordinator::new(app_data)),
        }
    }

    async fn admin_context(&self, req: &Request, auth: &SessionAuth) -> Result<RequestContext, AdminError> {
        self.access_gate
            .authorize(req, auth.token(), Requirement::Admin)
            .await
            .map_err(|e| self.fail(e))
    }

    fn fail(&self, err: InternalError) -> AdminError {
        AdminError::from_internal_error(err, self.error_exposure)
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// User management
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List all users
    #[oai(path = "/users", method = "get", tag = "AdminTags::Admin")]
    async fn list_users(&self, req: &Request, auth: SessionAuth) -> Result<Json<UserListResponse>, AdminError> {
        let ctx = self.admin_context(req, &auth).await?;
        let users = self
            .user_coordinator
            .list_users(&ctx)
            .await
            .map_err(|e| self.fail(e))?;

        let users: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();
        Ok(Json(UserListResponse {
            count: users.len() as u64,
            users,
        }))
    }

    /// Flip a user between admin and user
    ///
    /// Admins cannot change their own role.
    #[oai(path = "/toggle-role/:id", method = "patch", tag = "AdminTags::Admin")]
    async fn toggle_role(&self, req: &Request, auth: SessionAuth, id: Path<String>) -> Result<Json<UserActionResponse>, AdminError> {
        let ctx = self.admin_context(req, &auth).await?;
        let user = self
            .user_coordinator
            .toggle_role(&ctx, &id.0)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(UserActionResponse {
            message: "Role updated".to_string(),
            user: user.into(),
        }))
    }

    /// Permanently delete a user
    ///
    /// Admins cannot delete themselves.
    #[oai(path = "/user/:id", method = "delete", tag = "AdminTags::Admin")]
    async fn delete_user(&self, req: &Request, auth: SessionAuth, id: Path<String>) -> Result<Json<MessageResponse>, AdminError> {
        let ctx = self.admin_context(req, &auth).await?;
        self.user_coordinator
            .delete_user(&ctx, &id.0)
            .await
            .map_err(|e| self.fail(e))?;

        Ok(Json(MessageResponse::new("User deleted")))
    }
}
