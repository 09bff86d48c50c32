//! HTTP client for the workflow backend.
//!
//! ## Example
//!
//! ```no_run
//! use agentboard_client::{IssueSource, WorkflowClient};
//! use agentboard_config::BackendConfig;
//!
//! # async fn example() -> agentboard_client::Result<()> {
//! let client = WorkflowClient::new(&BackendConfig::default())?;
//! let issues = client.fetch_issues().await?;
//! println!("{} issues", issues.len());
//! # Ok(())
//! # }
//! ```

use agentboard_config::BackendConfig;
use agentboard_core::IssueRecord;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Path of the issue list endpoint.
pub const ISSUES_PATH: &str = "/api/issues";

/// Path of the workflow trigger endpoint.
pub const RUN_TASKS_PATH: &str = "/run_tasks";

/// Anything that can produce the current issue list.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetch the latest snapshot of issue records.
    async fn fetch_issues(&self) -> Result<Vec<IssueRecord>>;
}

/// Body of `POST /run_tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTasksRequest {
    pub assignee: String,
}

/// Response of `POST /run_tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTasksResponse {
    #[serde(default)]
    pub results: Vec<IssueRecord>,
}

/// Workflow backend client.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    client: reqwest::Client,
    base_url: String,
}

impl WorkflowClient {
    /// Create a client from backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Trigger a workflow run for `assignee` and return its results.
    ///
    /// Not part of the polling path.
    pub async fn run_tasks(&self, assignee: &str) -> Result<Vec<IssueRecord>> {
        let url = format!("{}{}", self.base_url, RUN_TASKS_PATH);
        debug!(%url, assignee, "triggering workflow run");

        let response = self
            .client
            .post(&url)
            .json(&RunTasksRequest {
                assignee: assignee.to_string(),
            })
            .send()
            .await?;

        let body: RunTasksResponse = Self::decode(response, RUN_TASKS_PATH).await?;
        Ok(body.results)
    }

    /// Check the status and decode the JSON body.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response, endpoint: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl IssueSource for WorkflowClient {
    async fn fetch_issues(&self) -> Result<Vec<IssueRecord>> {
        let url = format!("{}{}", self.base_url, ISSUES_PATH);
        debug!(%url, "fetching issues");

        let response = self.client.get(&url).send().await?;
        Self::decode(response, ISSUES_PATH).await
    }
}
