/*
[INPUT]:  Caller-supplied task fields
[OUTPUT]: Upsert request body (no executions on the wire)
[POS]:    Data layer - request payloads
[UPDATE]: When the upsert contract changes
*/

use serde::{Deserialize, Serialize};

/// Create-or-replace payload. `taskExecutions` is server-managed and never sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub command: String,
}

impl TaskDraft {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner: owner.into(),
            command: command.into(),
        }
    }

    /// Names of required fields that are blank, in wire order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("id", &self.id),
            ("name", &self.name),
            ("owner", &self.owner),
            ("command", &self.command),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}
