use std::sync::Arc;

use poem::Request;
use poem_openapi::auth::{ApiKey, Bearer};
use poem_openapi::{OpenApi, SecurityScheme, Tags, payload::Json};

use crate::app_data::AppData;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::errors::api::ErrorExposure;
use crate::providers::{AccessGate, Requirement};
use crate::types::dto::auth::{
    LoginApiResponse, LoginRequest, LoginResponse, LogoutApiResponse, RegisterApiResponse,
    RegisterRequest, RegisterResponse, UserSummary,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::context::RequestContext;

/// Account registration and session endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
    access_gate: Arc<AccessGate>,
    error_exposure: ErrorExposure,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            access_gate: app_data.access_gate.clone(),
            error_exposure: app_data.error_exposure,
            auth_coordinator: Arc::new(AuthCoordinator::new(app_data)),
        }
    }

    fn fail(&self, err: crate::errors::InternalError) -> AuthError {
        AuthError::from_internal_error(err, self.error_exposure)
    }
}

/// Session token carried in the `jwt` cookie set by login
#[derive(SecurityScheme)]
#[oai(ty = "api_key", key_name = "jwt", key_in = "cookie", checker = "non_blank_cookie")]
pub struct SessionCookie(ApiKey);

async fn non_blank_cookie(_req: &Request, cookie: ApiKey) -> Option<ApiKey> {
    (!cookie.key.trim().is_empty()).then_some(cookie)
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(Bearer);

/// Session credentials: the cookie wins over the `Authorization` header
///
/// A request carrying neither resolves to `Anonymous`; the access gate then
/// answers with its own 401 body.
#[derive(SecurityScheme)]
pub enum SessionAuth {
    Cookie(SessionCookie),
    Bearer(BearerAuth),
    #[oai(fallback)]
    Anonymous,
}

impl SessionAuth {
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Cookie(cookie) => Some(cookie.0.key.as_str()),
            Self::Bearer(bearer) => Some(bearer.0.token.as_str()),
            Self::Anonymous => None,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an account with role `user`
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(
        &self,
        req: &Request,
        body: Json<RegisterRequest>,
    ) -> Result<RegisterApiResponse, AuthError> {
        let ctx = RequestContext::for_request(req);
        let user = self
            .auth_coordinator
            .register(
                &ctx,
                body.username.as_deref(),
                body.email.as_deref(),
                body.password.as_deref(),
            )
            .await
            .map_err(|e| self.fail(e))?;

        Ok(RegisterApiResponse::Created(Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: user.into(),
        })))
    }

    /// Sign in as an admin
    ///
    /// The session token is returned in the body and set as the `jwt` cookie.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<LoginApiResponse, AuthError> {
        let ctx = RequestContext::for_request(req);
        let (issued, user) = self
            .auth_coordinator
            .login(&ctx, body.email.as_deref(), body.password.as_deref())
            .await
            .map_err(|e| self.fail(e))?;

        let cookie = self.auth_coordinator.session_cookie(&issued);
        Ok(LoginApiResponse::Ok(
            Json(LoginResponse {
                token: issued.token,
                expires_at: issued.expires_at,
                user: user.into(),
            }),
            cookie,
        ))
    }

    /// Clear the session cookie
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request, auth: SessionAuth) -> Result<LogoutApiResponse, AuthError> {
        let ctx = self
            .access_gate
            .authorize(req, auth.token(), Requirement::Session)
            .await
            .map_err(|e| self.fail(e))?;

        let cookie = self.auth_coordinator.logout(&ctx);
        Ok(LogoutApiResponse::Ok(
            Json(MessageResponse::new("Logged out successfully")),
            cookie,
        ))
    }

    /// Return the user behind the current session
    #[oai(path = "/check", method = "get", tag = "AuthTags::Authentication")]
    async fn check(&self, req: &Request, auth: SessionAuth) -> Result<Json<UserSummary>, AuthError> {
        let ctx = self
            .access_gate
            .authorize(req, auth.token(), Requirement::Session)
            .await
            .map_err(|e| self.fail(e))?;

        let user = self
            .auth_coordinator
            .current_user(&ctx)
            .await
            .map_err(|e| self.fail(e))?;
        Ok(Json(user.into()))
    }
}
