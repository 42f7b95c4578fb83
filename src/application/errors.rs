use crate::application::ports::ServiceError;
use crate::domain::value_objects::InvalidTransition;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Table {table_id} not found in metadata of database {database_id}")]
    NotFound { table_id: i64, database_id: i64 },
    #[error("Service error: {0}")]
    Service(String),
    #[error("Network error: {0}")]
    Transport(String),
    #[error("A workflow run is already in progress")]
    AlreadyRunning,
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

impl From<ServiceError> for WorkflowError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Transport(message) => WorkflowError::Transport(message),
            other => WorkflowError::Service(other.to_string()),
        }
    }
}

impl WorkflowError {
    /// Wraps a service failure, using `fallback` when the server gave no
    /// message of its own.
    pub fn service_with_fallback(error: ServiceError, fallback: &str) -> Self {
        match error {
            ServiceError::Transport(message) => WorkflowError::Transport(message),
            ServiceError::Status {
                message: Some(message),
                ..
            } => WorkflowError::Service(message),
            _ => WorkflowError::Service(fallback.to_string()),
        }
    }
}
