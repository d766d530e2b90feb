//! Typed error hierarchy for the adOS workflow board.
//!
//! Three enums cover the three failure surfaces:
//! - `WebhookError` — any call to the workflow-automation backend
//! - `BoardError` — bulk loads into the board state
//! - `DragError` — rejected drag gestures

use thiserror::Error;

use crate::workflow::models::Stage;

/// Errors from the webhook adapter.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("No URL configured for the {endpoint} webhook")]
    NotConfigured { endpoint: &'static str },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Webhook {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Move confirmation was interrupted before the backend answered")]
    Interrupted,
}

/// Errors from loading the board.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Failed to load tasks for account {account}: {source}")]
    Load {
        account: String,
        #[source]
        source: WebhookError,
    },
}

/// Reasons a drag gesture is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DragError {
    #[error("Task {active} is already being dragged")]
    AlreadyDragging { active: i64 },

    #[error("Task {id} not found on the board")]
    TaskNotFound { id: i64 },

    #[error("Task {id} is still saving its move to {target}")]
    TaskCommitting { id: i64, target: Stage },

    #[error("No drag in progress")]
    NoActiveDrag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_error_status_carries_code_and_url() {
        let err = WebhookError::Status {
            url: "https://hooks.test/workflow".into(),
            status: 502,
        };
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("hooks.test/workflow"));
    }

    #[test]
    fn board_error_wraps_webhook_source() {
        let err = BoardError::Load {
            account: "act_1".into(),
            source: WebhookError::NotConfigured { endpoint: "tasks" },
        };
        let source = std::error::Error::source(&err).expect("has source");
        assert!(source.to_string().contains("tasks"));
        assert!(err.to_string().contains("act_1"));
    }

    #[test]
    fn drag_error_committing_names_target() {
        let err = DragError::TaskCommitting {
            id: 3,
            target: Stage::Launched,
        };
        assert_eq!(err.to_string(), "Task 3 is still saving its move to Launched");
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&WebhookError::NotConfigured { endpoint: "status" });
        assert_std_error(&DragError::NoActiveDrag);
        assert_std_error(&BoardError::Load {
            account: "a".into(),
            source: WebhookError::NotConfigured { endpoint: "tasks" },
        });
    }
}
