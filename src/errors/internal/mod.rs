use thiserror::Error;

pub mod credential;
pub mod database;
pub mod media;
pub mod registry;

pub use credential::{CredentialError, SelfAction};
pub use database::DatabaseError;
pub use media::MediaError;
pub use registry::{DuplicateKey, RegistryError, UniqueField};

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors are shared, domain errors are grouped per registry.
/// Not exposed via API - endpoints must convert to an API error enum.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

impl InternalError {
    /// Wrap a sea-orm error, keeping unique-constraint violations distinguishable
    pub fn database(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        let operation = operation.into();
        match source.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                InternalError::Database(DatabaseError::UniqueViolation { operation, detail })
            }
            _ => InternalError::Database(DatabaseError::Operation { operation, source }),
        }
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        InternalError::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        InternalError::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Detail of a storage-level unique violation, if this is one
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            InternalError::Database(DatabaseError::UniqueViolation { detail, .. }) => Some(detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_helper_keeps_plain_errors_generic() {
        let err = InternalError::database("find_course", sea_orm::DbErr::Custom("boom".into()));
        assert!(matches!(
            err,
            InternalError::Database(DatabaseError::Operation { ref operation, .. }) if operation == "find_course"
        ));
        assert!(err.unique_violation().is_none());
    }

    #[test]
    fn test_registry_errors_convert_transparently() {
        let err: InternalError = RegistryError::InvalidCourse.into();
        assert_eq!(err.to_string(), "Invalid course selected");
    }

    #[test]
    fn test_parse_helper_message() {
        let err = InternalError::parse("date", "bad month");
        assert_eq!(err.to_string(), "Parse error: failed to parse date: bad month");
    }
}
