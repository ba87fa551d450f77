/*
[INPUT]:  Error sources (HTTP status, transport, serialization, URL)
[OUTPUT]: Gateway error taxonomy with kind classification
[POS]:    Error handling layer - unified error types for the adapter crate
[UPDATE]: When adding new error sources or changing status classification
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::Task;

/// The four failure kinds a caller of the gateway has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Execution,
    Transport,
}

/// Which gateway operation a response belongs to. Drives status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Upsert,
    Remove,
    Search,
    Execute,
}

/// Main error type for the task gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Backend rejected the request payload (4xx other than 404)
    #[error("Validation failed (status {status}): {message}")]
    Validation { status: u16, message: String },

    /// Target task does not exist, or a search matched nothing
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The remote run could not be launched or completed
    #[error("Execution failed: {message}")]
    Execution {
        message: String,
        /// Task state the backend returned alongside the failure, if any
        task: Option<Box<Task>>,
    },

    /// Backend answered with a server error outside of execute
    #[error("Backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Base URL cannot carry path segments
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl GatewayError {
    /// Collapse into one of the four caller-facing kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation { .. } => ErrorKind::Validation,
            GatewayError::NotFound { .. } => ErrorKind::NotFound,
            GatewayError::Execution { .. } => ErrorKind::Execution,
            GatewayError::Backend { .. }
            | GatewayError::Http(_)
            | GatewayError::Serialization(_)
            | GatewayError::UrlParse(_)
            | GatewayError::InvalidBaseUrl(_) => ErrorKind::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Task returned together with an execution failure.
    pub fn partial_task(&self) -> Option<&Task> {
        match self {
            GatewayError::Execution { task, .. } => task.as_deref(),
            _ => None,
        }
    }

    /// Classify a non-success status for the given operation.
    pub fn from_status(
        operation: Operation,
        status: StatusCode,
        message: impl Into<String>,
        task: Option<Task>,
    ) -> Self {
        let message = message.into();
        if status == StatusCode::NOT_FOUND {
            return GatewayError::NotFound { message };
        }
        if status.is_client_error() {
            return GatewayError::Validation {
                status: status.as_u16(),
                message,
            };
        }
        if operation == Operation::Execute {
            return GatewayError::Execution {
                message,
                task: task.map(Box::new),
            };
        }
        GatewayError::Backend {
            status: status.as_u16(),
            message,
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
