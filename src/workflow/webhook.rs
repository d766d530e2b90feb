//! HTTP adapter for the workflow-automation backend.
//!
//! Every call is a single attempt. Non-2xx responses and bodies that fail to
//! decode are reported as [`WebhookError`]; callers decide how to compensate.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::WebhookConfig;
use crate::errors::WebhookError;
use crate::workflow::models::{AdBlockGroup, Stage, StatusUpdate, Task};

/// The backend contract the board depends on.
/// Real implementation: `WebhookClient`. Tests provide in-memory doubles.
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    /// Bulk fetch of every task for an account.
    async fn fetch_tasks(&self, account_id: &str) -> Result<Vec<Task>, WebhookError>;

    /// Persist a stage change.
    async fn persist_status(&self, task_id: i64, stage: Stage) -> Result<(), WebhookError>;

    /// Ad-block versions attached to a task.
    async fn fetch_ad_blocks(&self, task_id: i64) -> Result<Vec<AdBlockGroup>, WebhookError>;
}

/// reqwest-backed [`WorkflowBackend`].
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    tasks_url: Option<String>,
    status_url: Option<String>,
    ad_blocks_url: Option<String>,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig, timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ados/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| WebhookError::Request {
                url: String::new(),
                source,
            })?;
        Ok(Self {
            client,
            tasks_url: config.tasks_url.clone(),
            status_url: config.status_url.clone(),
            ad_blocks_url: config.ad_blocks_url.clone(),
        })
    }

    fn endpoint<'a>(
        url: &'a Option<String>,
        endpoint: &'static str,
    ) -> Result<&'a str, WebhookError> {
        url.as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(WebhookError::NotConfigured { endpoint })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WebhookError> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|source| WebhookError::Request {
                url: url.to_string(),
                source,
            })?;
        let bytes = check_status(url, resp)?
            .bytes()
            .await
            .map_err(|source| WebhookError::Request {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| WebhookError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

fn check_status(url: &str, resp: reqwest::Response) -> Result<reqwest::Response, WebhookError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(WebhookError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl WorkflowBackend for WebhookClient {
    async fn fetch_tasks(&self, account_id: &str) -> Result<Vec<Task>, WebhookError> {
        let url = Self::endpoint(&self.tasks_url, "tasks")?;
        tracing::debug!(account_id, url, "fetching workflow tasks");
        self.get_json(url, &[("accountId", account_id)]).await
    }

    async fn persist_status(&self, task_id: i64, stage: Stage) -> Result<(), WebhookError> {
        let url = Self::endpoint(&self.status_url, "status")?;
        tracing::debug!(task_id, %stage, url, "persisting task status");
        let resp = self
            .client
            .post(url)
            .json(&StatusUpdate {
                id: task_id,
                status: stage,
            })
            .send()
            .await
            .map_err(|source| WebhookError::Request {
                url: url.to_string(),
                source,
            })?;
        check_status(url, resp)?;
        Ok(())
    }

    async fn fetch_ad_blocks(&self, task_id: i64) -> Result<Vec<AdBlockGroup>, WebhookError> {
        let url = Self::endpoint(&self.ad_blocks_url, "ad blocks")?;
        let id = task_id.to_string();
        self.get_json(url, &[("taskId", id.as_str())]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        routing::{get, post},
    };
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base: &str) -> WebhookClient {
        let config = WebhookConfig {
            tasks_url: Some(format!("{}/workflow", base)),
            status_url: Some(format!("{}/workflow-status", base)),
            ad_blocks_url: Some(format!("{}/ad-blocks", base)),
        };
        WebhookClient::new(&config, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_tasks_sends_account_and_parses_body() {
        let router = Router::new().route(
            "/workflow",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("accountId").map(String::as_str), Some("act_9"));
                Json(serde_json::json!([
                    {"id": 1, "name": "Hook A", "stage": "Briefed", "createdAt": "2024-05-01T10:00:00Z"},
                    {"id": 2, "name": "Hook B", "status": "Launched", "createdAt": "2024-05-02T10:00:00Z"}
                ]))
            }),
        );
        let client = client_for(&serve(router).await);

        let tasks = client.fetch_tasks("act_9").await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].stage, Stage::Briefed);
        assert_eq!(tasks[1].stage, Stage::Launched);
    }

    #[tokio::test]
    async fn test_fetch_tasks_empty_array_is_valid() {
        let router = Router::new().route("/workflow", get(|| async { Json(serde_json::json!([])) }));
        let client = client_for(&serve(router).await);
        assert!(client.fetch_tasks("act_1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_tasks_non_2xx_is_status_error() {
        let router = Router::new().route(
            "/workflow",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(&serve(router).await);
        match client.fetch_tasks("act_1").await {
            Err(WebhookError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_tasks_malformed_json_is_decode_error() {
        let router = Router::new().route("/workflow", get(|| async { "{not json" }));
        let client = client_for(&serve(router).await);
        assert!(matches!(
            client.fetch_tasks("act_1").await,
            Err(WebhookError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_persist_status_posts_id_and_label() {
        let seen: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let router = Router::new().route(
            "/workflow-status",
            post(move |Json(body): Json<serde_json::Value>| {
                let seen = seen_clone.clone();
                async move {
                    seen.lock().unwrap().push(body);
                    "ok"
                }
            }),
        );
        let client = client_for(&serve(router).await);

        client.persist_status(12, Stage::InProduction).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], serde_json::json!({"id": 12, "status": "In Production"}));
    }

    #[tokio::test]
    async fn test_persist_status_failure_status() {
        let router = Router::new().route(
            "/workflow-status",
            post(|| async { StatusCode::BAD_GATEWAY }),
        );
        let client = client_for(&serve(router).await);
        assert!(matches!(
            client.persist_status(1, Stage::Launched).await,
            Err(WebhookError::Status { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = client_for(&base);
        assert!(matches!(
            client.persist_status(1, Stage::Launched).await,
            Err(WebhookError::Request { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_not_configured() {
        let client =
            WebhookClient::new(&WebhookConfig::default(), Duration::from_secs(1)).unwrap();
        match client.fetch_ad_blocks(1).await {
            Err(WebhookError::NotConfigured { endpoint }) => assert_eq!(endpoint, "ad blocks"),
            other => panic!("Expected NotConfigured, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_ad_blocks_sends_task_id() {
        let router = Router::new().route(
            "/ad-blocks",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("taskId").map(String::as_str), Some("5"));
                Json(serde_json::json!([
                    {"version": "V1", "scenes": [{"scene": 1, "script": "Hook"}]}
                ]))
            }),
        );
        let client = client_for(&serve(router).await);
        let groups = client.fetch_ad_blocks(5).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].scenes[0].script, "Hook");
    }
}
