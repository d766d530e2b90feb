//! Drag-and-drop transactions over the board.
//!
//! ## Lifecycle
//!
//! ```text
//!  Idle ──pick_up──> Dragging ──release(None)──────────────> Idle
//!                        │  └──release(same stage)─────────> Idle
//!                        │
//!                        └──release(other stage)──> Committing
//!                                                      │ set_stage (optimistic)
//!                                                      │ persist_status ... await
//!                                                      ├─ Ok  ─> Idle + success toast
//!                                                      └─ Err ─> revert_stage + Idle + error toast
//! ```
//!
//! Releasing ends the gesture immediately, so another task can be picked up
//! while the first transaction is still waiting on the backend. A task whose
//! own transaction is still in flight cannot be picked up again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::{DragError, WebhookError};
use crate::workflow::board::SharedBoard;
use crate::workflow::models::{Stage, Task};
use crate::workflow::notify::{Notification, NotificationSink};
use crate::workflow::webhook::WorkflowBackend;

/// What the pointer was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty space in a stage column.
    Column(Stage),
    /// Another task card; resolves to that card's column.
    Card(i64),
}

impl DropTarget {
    /// Interpret a droppable id from the input layer: a stage label or slug
    /// is a column, an integer is a task card.
    pub fn from_droppable_id(id: &str) -> Option<Self> {
        if let Ok(stage) = id.parse::<Stage>() {
            return Some(Self::Column(stage));
        }
        id.trim().parse::<i64>().ok().map(Self::Card)
    }
}

/// Gesture state visible to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging { task_id: i64 },
}

/// Result of releasing a drag.
#[must_use]
#[derive(Debug)]
pub enum DropOutcome {
    /// Released outside every column; nothing changed.
    Cancelled { task_id: i64 },
    /// Released on the task's own column; nothing changed.
    Unchanged { task_id: i64, stage: Stage },
    /// The board already shows the move; confirm it with the backend.
    Committing(Transaction),
}

/// How a committed move ended.
#[derive(Debug)]
pub enum TransactionOutcome {
    Confirmed {
        task_id: i64,
        stage: Stage,
    },
    RolledBack {
        task_id: i64,
        restored: Stage,
        error: WebhookError,
    },
}

#[derive(Debug, Default)]
struct Session {
    active: Option<i64>,
    /// Task id -> stage it is being moved to.
    committing: HashMap<i64, Stage>,
}

type SessionHandle = Arc<Mutex<Session>>;

fn lock_session(session: &SessionHandle) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Coordinates drag gestures against a [`SharedBoard`].
#[derive(Clone)]
pub struct DragCoordinator {
    board: SharedBoard,
    backend: Arc<dyn WorkflowBackend>,
    sink: Arc<dyn NotificationSink>,
    session: SessionHandle,
}

impl DragCoordinator {
    pub fn new(
        board: SharedBoard,
        backend: Arc<dyn WorkflowBackend>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            board,
            backend,
            sink,
            session: SessionHandle::default(),
        }
    }

    pub fn board(&self) -> &SharedBoard {
        &self.board
    }

    pub fn phase(&self) -> DragPhase {
        match lock_session(&self.session).active {
            Some(task_id) => DragPhase::Dragging { task_id },
            None => DragPhase::Idle,
        }
    }

    pub fn active_task_id(&self) -> Option<i64> {
        lock_session(&self.session).active
    }

    /// Snapshot of the dragged task for drawing the detached card. The task
    /// itself stays in its origin column until release.
    pub fn active_task(&self) -> Option<Task> {
        let id = self.active_task_id()?;
        self.board.task(id)
    }

    /// Whether a transaction for `task_id` is waiting on the backend.
    pub fn is_committing(&self, task_id: i64) -> bool {
        lock_session(&self.session).committing.contains_key(&task_id)
    }

    /// Start dragging `task_id`.
    pub fn pick_up(&self, task_id: i64) -> Result<(), DragError> {
        let mut session = lock_session(&self.session);
        if let Some(active) = session.active {
            return Err(DragError::AlreadyDragging { active });
        }
        if let Some(&target) = session.committing.get(&task_id) {
            return Err(DragError::TaskCommitting {
                id: task_id,
                target,
            });
        }
        if self.board.task(task_id).is_none() {
            return Err(DragError::TaskNotFound { id: task_id });
        }
        session.active = Some(task_id);
        tracing::debug!(task_id, "drag started");
        Ok(())
    }

    /// Abandon the current gesture without touching the board.
    pub fn cancel(&self) -> Option<i64> {
        let task_id = lock_session(&self.session).active.take();
        if let Some(task_id) = task_id {
            tracing::debug!(task_id, "drag cancelled");
        }
        task_id
    }

    /// End the gesture over `target`.
    ///
    /// For a real move the board is updated before this returns; the returned
    /// [`Transaction`] must be confirmed to persist it.
    pub fn release(&self, target: Option<DropTarget>) -> Result<DropOutcome, DragError> {
        let task_id = lock_session(&self.session)
            .active
            .take()
            .ok_or(DragError::NoActiveDrag)?;

        let stage = match target {
            Some(DropTarget::Column(stage)) => Some(stage),
            Some(DropTarget::Card(card_id)) => self.board.task(card_id).map(|t| t.stage),
            None => None,
        };
        let Some(stage) = stage else {
            tracing::debug!(task_id, "dropped outside any column");
            return Ok(DropOutcome::Cancelled { task_id });
        };

        let Some(task) = self.board.task(task_id) else {
            // Reloaded away while dragging.
            return Ok(DropOutcome::Cancelled { task_id });
        };
        if task.stage == stage {
            tracing::debug!(task_id, %stage, "dropped on own column");
            return Ok(DropOutcome::Unchanged { task_id, stage });
        }

        let mut session = lock_session(&self.session);
        let Some(previous) = self.board.set_stage(task_id, stage) else {
            return Ok(DropOutcome::Cancelled { task_id });
        };
        session.committing.insert(task_id, stage);
        drop(session);

        tracing::debug!(task_id, from = %previous, to = %stage, "optimistic move applied");
        Ok(DropOutcome::Committing(Transaction {
            task_id,
            task_name: task.name,
            from: previous,
            to: stage,
            board: self.board.clone(),
            backend: self.backend.clone(),
            sink: self.sink.clone(),
            session: self.session.clone(),
            issued: false,
            settled: false,
        }))
    }

    /// Pick up, drop on `stage` and confirm in one call.
    ///
    /// Returns `None` when nothing needed saving.
    pub async fn move_task(
        &self,
        task_id: i64,
        stage: Stage,
    ) -> Result<Option<TransactionOutcome>, DragError> {
        self.pick_up(task_id)?;
        match self.release(Some(DropTarget::Column(stage)))? {
            DropOutcome::Committing(tx) => Ok(Some(tx.confirm().await)),
            DropOutcome::Cancelled { .. } | DropOutcome::Unchanged { .. } => Ok(None),
        }
    }
}

/// An optimistic move waiting for the backend.
///
/// Dropping it before [`confirm`](Self::confirm) is called puts the task back.
/// Once confirm has issued the status call, the call always runs to
/// completion, even if the caller stops waiting.
#[must_use = "an unconfirmed move is reverted when dropped"]
pub struct Transaction {
    task_id: i64,
    task_name: String,
    from: Stage,
    to: Stage,
    board: SharedBoard,
    backend: Arc<dyn WorkflowBackend>,
    sink: Arc<dyn NotificationSink>,
    session: SessionHandle,
    /// Status call sent to the backend.
    issued: bool,
    settled: bool,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("task_id", &self.task_id)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl Transaction {
    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    /// Stage the task is restored to if the backend refuses.
    pub fn origin(&self) -> Stage {
        self.from
    }

    pub fn target(&self) -> Stage {
        self.to
    }

    /// Persist the move, rolling back and notifying on failure. Not retried.
    ///
    /// The call runs on its own task, so dropping this future does not cancel
    /// a request already sent; its outcome still lands on the board and the sink.
    pub async fn confirm(self) -> TransactionOutcome {
        let task_id = self.task_id;
        let restored = self.from;
        match tokio::spawn(self.settle()).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            // Runtime shutdown; `Drop` already rolled back and notified.
            Err(_) => TransactionOutcome::RolledBack {
                task_id,
                restored,
                error: WebhookError::Interrupted,
            },
        }
    }

    async fn settle(mut self) -> TransactionOutcome {
        self.issued = true;
        let result = self.backend.persist_status(self.task_id, self.to).await;

        match result {
            Ok(()) => {
                self.settled = true;
                self.finish();
                tracing::info!(task_id = self.task_id, stage = %self.to, "task move confirmed");
                self.sink
                    .notify(Notification::success(format!("Task moved to {}", self.to)));
                TransactionOutcome::Confirmed {
                    task_id: self.task_id,
                    stage: self.to,
                }
            }
            Err(error) => {
                self.settled = true;
                self.roll_back();
                tracing::warn!(
                    task_id = self.task_id,
                    restored = %self.from,
                    error = %error,
                    "task move failed, rolled back"
                );
                self.sink.notify(Notification::error(
                    format!("Failed to move \"{}\"", self.task_name),
                    format!("It is back in {}. Please try again.", self.from),
                ));
                TransactionOutcome::RolledBack {
                    task_id: self.task_id,
                    restored: self.from,
                    error,
                }
            }
        }
    }

    /// Restore the origin stage and release the committing guard, in that
    /// order, under the session lock so no new drag of this task sees the
    /// stale stage.
    fn roll_back(&self) {
        let mut session = lock_session(&self.session);
        self.board.revert_stage(self.task_id, self.from);
        session.committing.remove(&self.task_id);
    }

    fn finish(&self) {
        lock_session(&self.session).committing.remove(&self.task_id);
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::debug!(task_id = self.task_id, "unsettled move dropped, reverting");
        self.roll_back();
        if self.issued {
            self.sink.notify(Notification::error(
                format!("Move of \"{}\" was interrupted", self.task_name),
                format!("It is back in {}. Please check and try again.", self.from),
            ));
        }
    }
}
