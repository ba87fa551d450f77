/*
[INPUT]:  Task ids, drafts and search terms
[OUTPUT]: Tasks decoded from the backend, arity normalized
[POS]:    HTTP layer - /tasks endpoints
[UPDATE]: When adding endpoints or changing the wire contract
*/

use reqwest::Method;
use tracing::debug;

use crate::http::error::{Operation, Result};
use crate::http::TaskClient;
use crate::types::{Task, TaskDraft, TaskPayload};

impl TaskClient {
    /// List every task, or the single task with `id`
    ///
    /// GET /tasks
    /// GET /tasks?id={id}
    pub async fn list_tasks(&self, id: Option<&str>) -> Result<Vec<Task>> {
        let mut builder = self.request(Method::GET, &["tasks"])?;
        if let Some(id) = id {
            builder = builder.query(&[("id", id)]);
        }
        debug!(task_id = ?id, "listing tasks");
        let payload: TaskPayload = self.send_json(Operation::List, builder).await?;
        Ok(payload.into_vec())
    }

    /// Create a task, or replace the mutable fields of an existing one
    ///
    /// PUT /tasks
    pub async fn upsert_task(&self, draft: &TaskDraft) -> Result<Task> {
        let builder = self.request(Method::PUT, &["tasks"])?.json(draft);
        debug!(task_id = %draft.id, "upserting task");
        self.send_json(Operation::Upsert, builder).await
    }

    /// Delete a task
    ///
    /// DELETE /tasks/{id}
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &["tasks", id])?;
        debug!(task_id = %id, "deleting task");
        self.send_empty(Operation::Remove, builder).await
    }

    /// Partial, case-insensitive name match. 404 when nothing matches.
    ///
    /// GET /tasks/search?name={term}
    pub async fn search_tasks(&self, name: &str) -> Result<Vec<Task>> {
        let builder = self
            .request(Method::GET, &["tasks", "search"])?
            .query(&[("name", name)]);
        debug!(term = %name, "searching tasks");
        let payload: TaskPayload = self.send_json(Operation::Search, builder).await?;
        Ok(payload.into_vec())
    }

    /// Run the task's command once and return the task with the new execution appended
    ///
    /// PUT /tasks/{id}/execute
    pub async fn execute_task(&self, id: &str) -> Result<Task> {
        let builder = self.request(Method::PUT, &["tasks", id, "execute"])?;
        debug!(task_id = %id, "executing task");
        self.send_json(Operation::Execute, builder).await
    }
}
