use huddle_entity::types::CallStateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),

    #[error("Database error: {message} (operation: {operation})")]
    DatabaseError { message: String, operation: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CallStateError> for RepositoryError {
    fn from(err: CallStateError) -> Self {
        RepositoryError::InvalidOperation { reason: err.to_string() }
    }
}
