/*
[INPUT]:  Test scenarios needing a backend
[OUTPUT]: In-memory TaskGateway fake, task fixtures
[POS]:    Test infrastructure - shared across synchronizer/selection tests
[UPDATE]: When the gateway trait or fixtures change
*/

//! Common test utilities for taskdeck-sync tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeDelta, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use taskdeck_adapter::{GatewayError, Result, Task, TaskDraft, TaskExecution, TaskGateway};
use taskdeck_sync::Synchronizer;
use tokio::sync::Notify;

/// Execution record with a deterministic timestamp per index
pub fn execution(idx: usize, output: &str) -> TaskExecution {
    let start = Utc.with_ymd_and_hms(2025, 10, 19, 10, 0, 0).unwrap() + TimeDelta::minutes(idx as i64);
    TaskExecution {
        start_time: start,
        end_time: start + TimeDelta::seconds(2),
        output: output.to_string(),
    }
}

pub fn task(id: &str, name: &str, outputs: &[&str]) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        owner: "Jane Doe".to_string(),
        command: "df -h /mnt/data".to_string(),
        task_executions: outputs
            .iter()
            .enumerate()
            .map(|(idx, output)| execution(idx, output))
            .collect(),
    }
}

pub fn not_found(message: &str) -> GatewayError {
    GatewayError::NotFound {
        message: message.to_string(),
    }
}

/// Backend held in memory. Records every call as "op:arg".
pub struct FakeGateway {
    backend: Mutex<Vec<Task>>,
    calls: Mutex<Vec<String>>,
    next_failure: Mutex<Option<GatewayError>>,
    next_output: Mutex<String>,
    answer_as: Mutex<Option<String>>,
    hold_execute: bool,
    /// Signalled when an execute call reaches the backend
    pub execute_entered: Notify,
    /// Lets a held execute call complete
    pub execute_release: Notify,
}

impl FakeGateway {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            backend: Mutex::new(tasks),
            calls: Mutex::new(Vec::new()),
            next_failure: Mutex::new(None),
            next_output: Mutex::new("ok\nExit Code: 0".to_string()),
            answer_as: Mutex::new(None),
            hold_execute: false,
            execute_entered: Notify::new(),
            execute_release: Notify::new(),
        }
    }

    /// Execute calls block until `execute_release` is notified
    pub fn holding_execute(mut self) -> Self {
        self.hold_execute = true;
        self
    }

    /// The next call of any kind fails with `err`
    pub fn fail_next(&self, err: GatewayError) {
        *self.next_failure.lock().unwrap() = Some(err);
    }

    pub fn set_next_output(&self, output: &str) {
        *self.next_output.lock().unwrap() = output.to_string();
    }

    /// The next execute runs the requested task but answers with `id`'s record
    pub fn answer_next_execute_as(&self, id: &str) {
        *self.answer_as.lock().unwrap() = Some(id.to_string());
    }

    /// Number of recorded calls for an operation ("list", "execute", ...)
    pub fn calls(&self, op: &str) -> usize {
        let prefix = format!("{op}:");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(&prefix))
            .count()
    }

    pub fn backend_task(&self, id: &str) -> Option<Task> {
        self.backend
            .lock()
            .unwrap()
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    /// Append an execution behind the synchronizer's back
    pub fn run_on_backend(&self, id: &str) -> Option<Task> {
        let output = self.next_output.lock().unwrap().clone();
        let mut backend = self.backend.lock().unwrap();
        let task = backend.iter_mut().find(|task| task.id == id)?;
        let idx = task.task_executions.len();
        task.task_executions.push(execution(idx, &output));
        Some(task.clone())
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.next_failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TaskGateway for FakeGateway {
    async fn list(&self, id: Option<&str>) -> Result<Vec<Task>> {
        self.record(format!("list:{}", id.unwrap_or("*")))?;
        let backend = self.backend.lock().unwrap();
        match id {
            None => Ok(backend.clone()),
            Some(id) => backend
                .iter()
                .find(|task| task.id == id)
                .map(|task| vec![task.clone()])
                .ok_or_else(|| not_found(&format!("Task not found with ID: {id}"))),
        }
    }

    async fn upsert(&self, draft: &TaskDraft) -> Result<Task> {
        self.record(format!("upsert:{}", draft.id))?;
        let mut backend = self.backend.lock().unwrap();
        match backend.iter_mut().find(|task| task.id == draft.id) {
            Some(existing) => {
                existing.name = draft.name.clone();
                existing.owner = draft.owner.clone();
                existing.command = draft.command.clone();
                Ok(existing.clone())
            }
            None => {
                let task = Task {
                    id: draft.id.clone(),
                    name: draft.name.clone(),
                    owner: draft.owner.clone(),
                    command: draft.command.clone(),
                    task_executions: Vec::new(),
                };
                backend.push(task.clone());
                Ok(task)
            }
        }
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.record(format!("remove:{id}"))?;
        let mut backend = self.backend.lock().unwrap();
        let idx = backend
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| not_found(&format!("Task not found with ID: {id}")))?;
        backend.remove(idx);
        Ok(())
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Task>> {
        self.record(format!("search:{term}"))?;
        let needle = term.to_lowercase();
        let found: Vec<Task> = self
            .backend
            .lock()
            .unwrap()
            .iter()
            .filter(|task| task.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(not_found(&format!("No tasks found with name containing: {term}")));
        }
        Ok(found)
    }

    async fn execute(&self, id: &str) -> Result<Task> {
        self.record(format!("execute:{id}"))?;
        if self.hold_execute {
            self.execute_entered.notify_one();
            self.execute_release.notified().await;
        }
        let output = self.next_output.lock().unwrap().clone();
        let mut backend = self.backend.lock().unwrap();
        let task = backend
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| not_found(&format!("Task not found with ID: {id}")))?;
        let idx = task.task_executions.len();
        task.task_executions.push(execution(idx, &output));
        let ran = task.clone();
        match self.answer_as.lock().unwrap().take() {
            Some(other) => backend
                .iter()
                .find(|task| task.id == other)
                .cloned()
                .ok_or_else(|| not_found(&format!("Task not found with ID: {other}"))),
            None => Ok(ran),
        }
    }
}

/// Synchronizer over a shared fake, store preloaded from the backend state
pub async fn loaded_sync(tasks: Vec<Task>) -> (Arc<FakeGateway>, Synchronizer<Arc<FakeGateway>>) {
    let fake = Arc::new(FakeGateway::with_tasks(tasks));
    let sync = Synchronizer::new(fake.clone());
    sync.refresh_all().await.expect("initial load");
    (fake, sync)
}
