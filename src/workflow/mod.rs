//! Production workflow board: Kanban stages, drag transactions, detail overlay.
//!
//! ## Overview
//!
//! Tasks are fetched in bulk per ad account from the workflow webhook and held
//! in a flat [`board::BoardState`]. Columns are derived from each task's
//! `stage` on every query. Moving a card is an optimistic transaction: the
//! board changes first, the backend is told second, and a refusal puts the
//! card back.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐ pick_up / release ┌───────────────────────────────────────────┐
//! │ Renderer │ ────────────────> │ drag.rs  (DragCoordinator, Transaction)   │
//! │  (CLI)   │ <──────────────── │    │ set_stage / revert_stage             │
//! └──────────┘   columns()       │    v                                      │
//!                                │ board.rs (BoardState, SharedBoard)        │
//!                                │    │ fetch_tasks / persist_status         │
//!                                │    v                                      │
//!                                │ webhook.rs (WorkflowBackend, WebhookClient)│
//!                                └───────────────────────────────────────────┘
//! ```
//!
//! | Module    | Responsibility                                          |
//! |-----------|---------------------------------------------------------|
//! | `models`  | `Task`, `Stage`, `AdBlockGroup`, `Scene`                |
//! | `board`   | Task collection, stage queries, optimistic mutation     |
//! | `drag`    | Gesture lifecycle and move-confirm-rollback transaction |
//! | `webhook` | `WorkflowBackend` trait and its reqwest implementation  |
//! | `detail`  | Ad-block versions for the detail overlay                |
//! | `notify`  | Toast notifications for transaction outcomes            |

pub mod board;
pub mod detail;
pub mod drag;
pub mod models;
pub mod notify;
pub mod webhook;

pub use board::{BoardState, SharedBoard};
pub use detail::DetailLoader;
pub use drag::{DragCoordinator, DragPhase, DropOutcome, DropTarget, Transaction, TransactionOutcome};
pub use models::{AdBlockGroup, Scene, Stage, Task};
pub use notify::{Notification, NotificationLog, NotificationSink, Severity};
pub use webhook::{WebhookClient, WorkflowBackend};
