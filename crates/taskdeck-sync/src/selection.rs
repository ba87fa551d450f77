/*
[INPUT]:  Search term edits, history open/close, execute/create/delete requests from a view
[OUTPUT]: Visible task rows and the selected task snapshot
[POS]:    Presentation boundary - selection and filter state over the synchronizer
[UPDATE]: When view-facing state or actions change
*/

use std::sync::Arc;
use taskdeck_adapter::{Task, TaskDraft, TaskGateway};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SyncError};
use crate::outcome::{HistorySummary, LastOutcome, last_outcome};
use crate::sync::{ExecutionReport, SearchOutcome, Synchronizer};

/// One row of a task list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub command: String,
    pub runs: usize,
    pub last: LastOutcome,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            owner: task.owner.clone(),
            command: task.command.clone(),
            runs: task.execution_count(),
            last: last_outcome(task),
        }
    }
}

/// Search term plus the task whose execution history is open.
///
/// Never mutates the store directly; every change goes through the
/// synchronizer. The selection is independent of filtering and survives
/// store replacement.
pub struct SelectionController<G> {
    sync: Arc<Synchronizer<G>>,
    search_term: String,
    selected: Option<Task>,
}

impl<G: TaskGateway> SelectionController<G> {
    pub fn new(sync: Arc<Synchronizer<G>>) -> Self {
        Self {
            sync,
            search_term: String::new(),
            selected: None,
        }
    }

    pub fn synchronizer(&self) -> &Arc<Synchronizer<G>> {
        &self.sync
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub async fn trigger_search(&self) -> Result<SearchOutcome> {
        self.sync.search(&self.search_term).await
    }

    pub async fn reset_search(&mut self) -> Result<usize> {
        self.search_term.clear();
        self.sync.refresh_all().await
    }

    /// Rows in store order.
    pub fn visible_tasks(&self) -> Vec<TaskRow> {
        self.sync.snapshot().iter().map(TaskRow::from).collect()
    }

    /// Open the history view for a task currently in the store.
    pub fn open_history(&mut self, id: &str) -> Option<&Task> {
        let task = self.sync.task(id)?;
        self.selected = Some(task);
        self.selected.as_ref()
    }

    pub fn close_history(&mut self) {
        self.selected = None;
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|task| task.id.as_str())
    }

    /// Latest store record for the selection, or the retained snapshot when
    /// the store no longer lists it.
    pub fn selected_task(&self) -> Option<Task> {
        let selected = self.selected.as_ref()?;
        self.sync
            .task(&selected.id)
            .or_else(|| Some(selected.clone()))
    }

    pub fn selected_summary(&self) -> Option<HistorySummary> {
        self.selected_task().as_ref().map(HistorySummary::of)
    }

    /// Whether the execute control for `id` should be disabled.
    pub fn is_executing(&self, id: &str) -> bool {
        self.sync.is_executing(id)
    }

    /// Point the selection at a fresh backend record if it has the same id.
    pub fn apply_fresh_task(&mut self, task: &Task) {
        if let Some(selected) = self.selected.as_mut() {
            if selected.id == task.id {
                *selected = task.clone();
            }
        }
    }

    pub async fn execute(&mut self, id: &str) -> Result<ExecutionReport> {
        self.execute_with_cancel(id, &CancellationToken::new()).await
    }

    pub async fn execute_with_cancel(
        &mut self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ExecutionReport> {
        match self.sync.execute_and_merge_with_cancel(id, cancel).await {
            Ok(report) => {
                self.apply_fresh_task(&report.task);
                Ok(report)
            }
            Err(err) => {
                if let SyncError::Execution { task: Some(task), .. } = &err {
                    self.apply_fresh_task(task);
                }
                Err(err)
            }
        }
    }

    pub async fn execute_selected(&mut self) -> Result<ExecutionReport> {
        let id = self
            .selected_task_id()
            .map(str::to_string)
            .ok_or_else(|| SyncError::NotFound {
                message: "no task selected".to_string(),
            })?;
        self.execute(&id).await
    }

    /// Upsert then reload the catalogue, as a creation form does on success.
    pub async fn create_task(&mut self, draft: &TaskDraft) -> Result<Task> {
        let task = self.sync.create(draft).await?;
        self.apply_fresh_task(&task);
        self.sync.refresh_all().await?;
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: &str) -> Result<()> {
        self.sync.remove(id).await?;
        if self.selected_task_id() == Some(id) {
            self.selected = None;
        }
        Ok(())
    }
}
