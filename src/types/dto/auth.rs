use poem_openapi::{ApiResponse, Object, payload::Json};
use serde::{Deserialize, Serialize};

use crate::types::db::{Role, user};

/// Request model for account registration
///
/// Fields are optional at the schema level so a missing field yields the
/// regular "All fields are required" error.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User as shown to clients; never carries the password hash
#[derive(Object, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile_image: String,
    pub created_at: i64,
}

impl From<user::Model> for UserSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Session token for non-cookie clients plus the signed-in user
#[derive(Object, Debug)]
pub struct LoginResponse {
    pub token: String,
    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,
    pub user: UserSummary,
}

/// API response for register endpoint
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),
}

/// API response for login endpoint
#[derive(ApiResponse)]
pub enum LoginApiResponse {
    /// Session issued; the token is also set as the `jwt` cookie
    #[oai(status = 200)]
    Ok(
        Json<LoginResponse>,
        #[oai(header = "Set-Cookie")] String,
    ),
}

/// API response for logout endpoint
#[derive(ApiResponse)]
pub enum LogoutApiResponse {
    /// Session cookie cleared
    #[oai(status = 200)]
    Ok(
        Json<super::common::MessageResponse>,
        #[oai(header = "Set-Cookie")] String,
    ),
}
