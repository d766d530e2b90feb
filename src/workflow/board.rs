//! In-memory board state.
//!
//! Tasks live in one flat `Vec` in the order the last load returned them.
//! Columns are never stored; every grouping query filters that vector, so a
//! task is always in exactly the column named by its `stage` field.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::BoardError;
use crate::workflow::models::{Stage, Task};
use crate::workflow::webhook::WorkflowBackend;

/// Tasks for the currently selected account.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    account: Option<String>,
    tasks: Vec<Task>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from tasks already in hand.
    pub fn with_tasks(account: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            account: Some(account.into()),
            tasks,
        }
    }

    /// Account whose tasks are loaded, if any.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Swap in a freshly fetched collection wholesale.
    pub fn replace(&mut self, account: impl Into<String>, tasks: Vec<Task>) {
        self.account = Some(account.into());
        self.tasks = tasks;
    }

    pub fn tasks_in_stage(&self, stage: Stage) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.stage == stage).collect()
    }

    /// Every stage in column order with its tasks; empty columns included.
    pub fn columns(&self) -> Vec<(Stage, Vec<&Task>)> {
        Stage::ALL
            .iter()
            .map(|&stage| (stage, self.tasks_in_stage(stage)))
            .collect()
    }

    /// Move a task and return the stage it left, or `None` if the id is unknown.
    pub fn set_stage(&mut self, task_id: i64, stage: Stage) -> Option<Stage> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        let previous = task.stage;
        task.stage = stage;
        Some(previous)
    }

    /// Put a task back on `stage` after a failed confirmation.
    pub fn revert_stage(&mut self, task_id: i64, stage: Stage) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            task.stage = stage;
        }
    }
}

/// Board handle shared by the renderer and in-flight transactions.
///
/// The lock is only ever held for a single synchronous read or write, never
/// across an await.
#[derive(Debug, Clone, Default)]
pub struct SharedBoard {
    inner: Arc<Mutex<BoardState>>,
}

impl SharedBoard {
    pub fn new(state: BoardState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    // Every mutation is a single field write, so a poisoned lock still
    // guards a consistent board.
    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the board under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&BoardState) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> BoardState {
        self.lock().clone()
    }

    pub fn task(&self, id: i64) -> Option<Task> {
        self.lock().task(id).cloned()
    }

    pub fn tasks_in_stage(&self, stage: Stage) -> Vec<Task> {
        self.lock()
            .tasks_in_stage(stage)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn set_stage(&self, task_id: i64, stage: Stage) -> Option<Stage> {
        self.lock().set_stage(task_id, stage)
    }

    pub fn revert_stage(&self, task_id: i64, stage: Stage) {
        self.lock().revert_stage(task_id, stage);
    }

    /// Replace the board with the account's tasks from `backend`.
    ///
    /// A missing or blank account is a no-op returning `Ok(None)`. On failure
    /// the current tasks are kept.
    pub async fn load(
        &self,
        backend: &dyn WorkflowBackend,
        account_id: Option<&str>,
    ) -> Result<Option<Vec<Task>>, BoardError> {
        let Some(account) = account_id.map(str::trim).filter(|a| !a.is_empty()) else {
            tracing::debug!("no account selected, skipping board load");
            return Ok(None);
        };

        match backend.fetch_tasks(account).await {
            Ok(tasks) => {
                tracing::info!(account, count = tasks.len(), "loaded workflow board");
                self.lock().replace(account, tasks.clone());
                Ok(Some(tasks))
            }
            Err(source) => {
                tracing::error!(account, error = %source, "failed to load workflow board");
                Err(BoardError::Load {
                    account: account.to_string(),
                    source,
                })
            }
        }
    }
}
