/*
[INPUT]:  Task records confirmed by the backend
[OUTPUT]: Ordered, id-unique view of backend state
[POS]:    State layer - single source of truth for rendering
[UPDATE]: When reconciliation rules change
*/

use std::collections::{HashMap, HashSet};
use taskdeck_adapter::Task;

/// In-memory collection of tasks keyed by id, in display order.
///
/// Never holds two entries with the same id. Only the synchronizer mutates
/// it, and only after a backend round trip has resolved.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    revision: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.replace_all(tasks);
        store
    }

    /// Swap in a whole new collection. Later duplicates overwrite earlier
    /// ones in place so the first occurrence keeps its position.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(tasks.len());
        let mut unique: Vec<Task> = Vec::with_capacity(tasks.len());
        for task in tasks {
            match positions.get(&task.id) {
                Some(&idx) => unique[idx] = task,
                None => {
                    positions.insert(task.id.clone(), unique.len());
                    unique.push(task);
                }
            }
        }
        self.tasks = unique;
        self.bump();
    }

    /// Id-keyed replace. Returns `false` (and leaves membership alone) when
    /// the id is not currently held.
    pub fn replace(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(slot) => {
                *slot = task;
                self.bump();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(idx);
        self.bump();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.bump();
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Bumped on every mutation; lets subscribers skip unchanged snapshots.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_unique_ids(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.tasks.len());
        self.tasks.iter().all(|task| seen.insert(task.id.as_str()))
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
