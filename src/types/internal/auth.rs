use serde::{Deserialize, Serialize};

use crate::types::db::{Role, user};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Identity resolved by the access gate and attached to the request context
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&user::Model> for AuthenticatedUser {
    fn from(model: &user::Model) -> Self {
        Self {
            id: model.id.clone(),
            username: model.username.clone(),
            email: model.email.clone(),
            role: model.role,
        }
    }
}
