use std::fmt;

use thiserror::Error;

/// Identity-management actions an admin may not perform on themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfAction {
    ChangeRole,
    Delete,
}

impl fmt::Display for SelfAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfAction::ChangeRole => f.write_str("Cannot change your own role"),
            SelfAction::Delete => f.write_str("Cannot delete yourself"),
        }
    }
}

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Unauthorized - No token")]
    MissingToken,

    #[error("Unauthorized - Invalid token")]
    InvalidToken,

    #[error("Unauthorized - Token expired")]
    ExpiredToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin access only")]
    AdminRequired,

    #[error("Username already exists")]
    DuplicateUsername(String),

    #[error("Email already exists")]
    DuplicateEmail(String),

    #[error("User not found")]
    UserIdNotFound { user_id: String },

    #[error("{0}")]
    SelfModificationDenied(SelfAction),

    #[error("Password should be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("All fields are required")]
    MissingFields,
}

impl CredentialError {
    pub fn user_id_not_found(user_id: impl Into<String>) -> Self {
        CredentialError::UserIdNotFound {
            user_id: user_id.into(),
        }
    }
}
