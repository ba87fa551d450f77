/*
[INPUT]:  Task operations requested by the synchronizer
[OUTPUT]: One round trip per call, results normalized to Vec<Task>
[POS]:    Gateway seam - trait the synchronizer depends on
[UPDATE]: When the set of backend operations changes
*/

use async_trait::async_trait;
use std::sync::Arc;

use crate::http::{Result, TaskClient};
use crate::types::{Task, TaskDraft};

/// Narrow contract of the execution backend.
///
/// Every call is a single round trip with no retries. `list` and
/// `search_by_name` always yield `0..N` tasks regardless of the wire arity.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn list(&self, id: Option<&str>) -> Result<Vec<Task>>;

    async fn upsert(&self, draft: &TaskDraft) -> Result<Task>;

    async fn remove(&self, id: &str) -> Result<()>;

    /// Fails with `NotFound` when nothing matches.
    async fn search_by_name(&self, term: &str) -> Result<Vec<Task>>;

    /// Resolves once the remote run has completed.
    async fn execute(&self, id: &str) -> Result<Task>;
}

#[async_trait]
impl TaskGateway for TaskClient {
    async fn list(&self, id: Option<&str>) -> Result<Vec<Task>> {
        self.list_tasks(id).await
    }

    async fn upsert(&self, draft: &TaskDraft) -> Result<Task> {
        self.upsert_task(draft).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.delete_task(id).await
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Task>> {
        self.search_tasks(term).await
    }

    async fn execute(&self, id: &str) -> Result<Task> {
        self.execute_task(id).await
    }
}

#[async_trait]
impl<G: TaskGateway + ?Sized> TaskGateway for Arc<G> {
    async fn list(&self, id: Option<&str>) -> Result<Vec<Task>> {
        (**self).list(id).await
    }

    async fn upsert(&self, draft: &TaskDraft) -> Result<Task> {
        (**self).upsert(draft).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        (**self).remove(id).await
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Task>> {
        (**self).search_by_name(term).await
    }

    async fn execute(&self, id: &str) -> Result<Task> {
        (**self).execute(id).await
    }
}
