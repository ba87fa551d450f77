/*
[INPUT]:  TaskGateway implementation, user actions (refresh/create/remove/search/execute)
[OUTPUT]: TaskStore reconciled with backend results, published over a watch channel
[POS]:    Orchestration layer - gateway calls and store reconciliation
[UPDATE]: When reconciliation rules or single-flight semantics change
*/

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use taskdeck_adapter::{Task, TaskDraft, TaskGateway};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Result, SyncError};
use crate::outcome::{LastOutcome, last_outcome};
use crate::store::TaskStore;

/// Result of a name search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty term: the whole catalogue was reloaded.
    Reset { count: usize },
    Matches { count: usize },
    /// Nothing matched; the store is now empty. Not an error.
    NoMatches,
}

/// What an execute round trip produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Fresh task as returned by the backend.
    pub task: Task,
    /// Whether the store held the id and was updated. `false` when the task
    /// was filtered out by a prior search.
    pub merged: bool,
    pub outcome: LastOutcome,
}

/// Drives gateway calls and reconciles their results into the task store.
///
/// The store is mutated only after a call resolves. Results carrying a full
/// task are applied by id-keyed replace, never appended.
pub struct Synchronizer<G> {
    gateway: G,
    store: watch::Sender<TaskStore>,
    in_flight: Mutex<HashSet<String>>,
    execute_timeout: Option<Duration>,
}

impl<G: TaskGateway> Synchronizer<G> {
    pub fn new(gateway: G) -> Self {
        let (store, _) = watch::channel(TaskStore::new());
        Self {
            gateway,
            store,
            in_flight: Mutex::new(HashSet::new()),
            execute_timeout: None,
        }
    }

    /// Bound every execute round trip. `None` waits for the backend indefinitely.
    pub fn with_execute_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.execute_timeout = timeout;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Views re-render from this receiver whenever the store changes.
    pub fn subscribe(&self) -> watch::Receiver<TaskStore> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> TaskStore {
        self.store.borrow().clone()
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.store.borrow().get(id).cloned()
    }

    /// True while an execute for `id` is outstanding.
    pub fn is_executing(&self, id: &str) -> bool {
        lock(&self.in_flight).contains(id)
    }

    /// Reload the whole catalogue. A 404 from the backend means "no tasks".
    pub async fn refresh_all(&self) -> Result<usize> {
        debug!("refreshing all tasks");
        let tasks = match self.gateway.list(None).await {
            Ok(tasks) => tasks,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to load tasks");
                return Err(err.into());
            }
        };
        let count = self.replace_all(tasks);
        info!(count, "task store refreshed");
        Ok(count)
    }

    /// Reload a single task by id and patch it into the store.
    pub async fn fetch_one(&self, id: &str) -> Result<Task> {
        let tasks = self
            .gateway
            .list(Some(id))
            .await
            .map_err(|err| SyncError::from_gateway(err, Some(id)))?;
        let task = tasks
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| SyncError::NotFound {
                message: format!("Task not found with ID: {id}"),
            })?;
        self.merge(task.clone());
        Ok(task)
    }

    /// Create-or-replace. Blank required fields are rejected before any call.
    pub async fn create(&self, draft: &TaskDraft) -> Result<Task> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(SyncError::Validation {
                message: format!("missing required field(s): {}", missing.join(", ")),
            });
        }

        let task = self.gateway.upsert(draft).await.map_err(|err| {
            warn!(task_id = %draft.id, error = %err, "failed to upsert task");
            SyncError::from_gateway(err, Some(&draft.id))
        })?;
        let merged = self.merge(task.clone());
        info!(task_id = %task.id, merged, "task upserted");
        Ok(task)
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.gateway.remove(id).await.map_err(|err| {
            warn!(task_id = %id, error = %err, "failed to delete task");
            SyncError::from_gateway(err, Some(id))
        })?;
        self.store.send_if_modified(|store| store.remove(id).is_some());
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Replace the store with tasks whose name matches `term`.
    ///
    /// An empty term reloads everything. "No matches" empties the store and is
    /// reported as an outcome; any other failure leaves the store untouched.
    pub async fn search(&self, term: &str) -> Result<SearchOutcome> {
        if term.is_empty() {
            let count = self.refresh_all().await?;
            return Ok(SearchOutcome::Reset { count });
        }

        let tasks = match self.gateway.search_by_name(term).await {
            Ok(tasks) => tasks,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => {
                warn!(%term, error = %err, "search failed");
                return Err(err.into());
            }
        };

        let count = self.replace_all(tasks);
        info!(%term, count, "search applied");
        if count == 0 {
            Ok(SearchOutcome::NoMatches)
        } else {
            Ok(SearchOutcome::Matches { count })
        }
    }

    /// Run the task once and merge the returned record into the store.
    pub async fn execute_and_merge(&self, id: &str) -> Result<ExecutionReport> {
        self.execute_and_merge_with_cancel(id, &CancellationToken::new())
            .await
    }

    /// As [`execute_and_merge`](Self::execute_and_merge), abandoning the wait
    /// when `cancel` fires. A cancelled or timed-out run leaves the store as is.
    pub async fn execute_and_merge_with_cancel(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ExecutionReport> {
        let _flight = self.begin_flight(id)?;
        info!(task_id = %id, "executing task");

        let task = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(task_id = %id, "execution cancelled");
                return Err(SyncError::Cancelled { id: id.to_string() });
            }
            result = self.execute_remote(id) => result?,
        };

        if task.id != id {
            warn!(task_id = %id, returned_id = %task.id, "backend returned a different task");
            return Err(SyncError::Transport {
                message: format!("execute of {id} answered with task {}", task.id),
            });
        }
        let outcome = last_outcome(&task);
        let merged = self.merge(task.clone());
        info!(task_id = %id, merged, runs = task.execution_count(), %outcome, "execution merged");

        Ok(ExecutionReport {
            task,
            merged,
            outcome,
        })
    }

    async fn execute_remote(&self, id: &str) -> Result<Task> {
        let call = self.gateway.execute(id);
        let result = match self.execute_timeout {
            Some(after) => match tokio::time::timeout(after, call).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(task_id = %id, timeout_secs = after.as_secs(), "execution timed out");
                    return Err(SyncError::TimedOut {
                        id: id.to_string(),
                        after,
                    });
                }
            },
            None => call.await,
        };

        result.map_err(|err| {
            let err = SyncError::from_gateway(err, Some(id));
            if let SyncError::Execution { task: Some(task), .. } = &err {
                if task.id == id {
                    self.merge(task.as_ref().clone());
                }
            }
            warn!(task_id = %id, error = %err, "execution failed");
            err
        })
    }

    fn begin_flight(&self, id: &str) -> Result<FlightGuard<'_>> {
        if !lock(&self.in_flight).insert(id.to_string()) {
            debug!(task_id = %id, "execute rejected, already in flight");
            return Err(SyncError::Busy { id: id.to_string() });
        }
        Ok(FlightGuard {
            in_flight: &self.in_flight,
            id: id.to_string(),
        })
    }

    fn replace_all(&self, tasks: Vec<Task>) -> usize {
        self.store.send_modify(|store| store.replace_all(tasks));
        self.store.borrow().len()
    }

    fn merge(&self, task: Task) -> bool {
        self.store.send_if_modified(|store| store.replace(task))
    }
}

/// Releases the single-flight slot for an id when dropped.
struct FlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<String>>,
    id: String,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.in_flight).remove(&self.id);
    }
}

fn lock(in_flight: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}
