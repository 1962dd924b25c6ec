use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Storage-level duplicate key, raised when a write races past the duplicate probe
    #[error("Database error: {operation} violated a unique constraint: {detail}")]
    UniqueViolation { operation: String, detail: String },

    #[error("Migration failed: {source}")]
    Migration {
        #[source]
        source: sea_orm::DbErr,
    },
}
