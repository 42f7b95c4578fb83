use reqwest::StatusCode;

/// Failure reported by any remote collaborator behind a port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("{}", status_message(.status, .message))]
    Status { status: u16, message: Option<String> },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn status_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Request failed with status {}", status),
    }
}

impl ServiceError {
    pub fn status(status: StatusCode, message: Option<String>) -> Self {
        ServiceError::Status {
            status: status.as_u16(),
            message,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(StatusCode::CONFLICT.as_u16())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Transport(_))
    }

    /// Message the server put in its error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ServiceError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
