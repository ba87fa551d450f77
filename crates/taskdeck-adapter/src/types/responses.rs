/*
[INPUT]:  Raw response bodies from list/search and error replies
[OUTPUT]: Normalized task lists and backend error messages
[POS]:    Data layer - response shapes
[UPDATE]: When response arity or error body format changes
*/

use serde::Deserialize;

use super::models::Task;

/// List endpoints answer with an array, a bare object (single match) or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskPayload {
    Many(Vec<Task>),
    One(Box<Task>),
    Empty(()),
}

impl TaskPayload {
    pub fn into_vec(self) -> Vec<Task> {
        match self {
            TaskPayload::Many(tasks) => tasks,
            TaskPayload::One(task) => vec![*task],
            TaskPayload::Empty(()) => Vec::new(),
        }
    }
}

/// Error body of the backend (Spring-style); every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message: `message`, then `error`.
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|e| !e.trim().is_empty()))
    }
}
