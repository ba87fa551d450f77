/*
[INPUT]:  GatewayError from the adapter, local guard failures
[OUTPUT]: SyncError surfaced to views, with a stable kind
[POS]:    Error handling layer - synchronizer boundary
[UPDATE]: When the error taxonomy or gateway classification changes
*/

use std::time::Duration;
use taskdeck_adapter::{ErrorKind as GatewayErrorKind, GatewayError, Task};
use thiserror::Error;

/// Error categories a view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Execution,
    Transport,
    /// An execute for the same task is already in flight.
    Busy,
    /// The caller cancelled an in-flight execute.
    Cancelled,
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Execution of {id} failed: {message}")]
    Execution {
        id: String,
        message: String,
        /// Task state returned with the failure; merged into the store when its id is `id`.
        task: Option<Box<Task>>,
    },

    #[error("Backend unreachable: {message}")]
    Transport { message: String },

    #[error("Task {id} is already executing")]
    Busy { id: String },

    #[error("Execution of {id} was cancelled")]
    Cancelled { id: String },

    #[error("Execution of {id} timed out after {}s", .after.as_secs())]
    TimedOut { id: String, after: Duration },
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Validation { .. } => ErrorKind::Validation,
            SyncError::NotFound { .. } => ErrorKind::NotFound,
            SyncError::Execution { .. } => ErrorKind::Execution,
            SyncError::Transport { .. } | SyncError::TimedOut { .. } => ErrorKind::Transport,
            SyncError::Busy { .. } => ErrorKind::Busy,
            SyncError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Convert a gateway failure raised while operating on `id`.
    pub(crate) fn from_gateway(err: GatewayError, id: Option<&str>) -> Self {
        match err.kind() {
            GatewayErrorKind::Validation => SyncError::Validation {
                message: gateway_message(err),
            },
            GatewayErrorKind::NotFound => SyncError::NotFound {
                message: gateway_message(err),
            },
            GatewayErrorKind::Execution => {
                let task = err.partial_task().cloned().map(Box::new);
                SyncError::Execution {
                    id: id.unwrap_or_default().to_string(),
                    message: gateway_message(err),
                    task,
                }
            }
            GatewayErrorKind::Transport => SyncError::Transport {
                message: err.to_string(),
            },
        }
    }
}

fn gateway_message(err: GatewayError) -> String {
    match err {
        GatewayError::Validation { message, .. }
        | GatewayError::NotFound { message }
        | GatewayError::Execution { message, .. } => message,
        other => other.to_string(),
    }
}

impl From<GatewayError> for SyncError {
    fn from(err: GatewayError) -> Self {
        SyncError::from_gateway(err, None)
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
