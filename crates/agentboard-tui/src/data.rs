//! Live workflow data for the dashboard.
//!
//! [`DashboardData`] owns a small tokio runtime that drives the issue poller in
//! the background. The UI thread never blocks on the network: it drains poll
//! events each frame and folds them into a [`WorkflowSnapshot`].

use std::sync::Arc;
use std::time::Instant;

use agentboard_client::{IssueSource, WorkflowClient, WorkflowPoller, WorkflowSnapshot};
use agentboard_config::BoardConfig;
use tracing::{debug, info};

use crate::app::AppResult;

/// Issue data plus the machinery that keeps it fresh.
pub struct DashboardData {
    // Declared before `runtime` so the poll task is aborted before the
    // runtime shuts down.
    poller: Option<WorkflowPoller>,
    runtime: Option<tokio::runtime::Runtime>,
    snapshot: WorkflowSnapshot,
}

impl DashboardData {
    /// Start polling the backend described by `config`.
    pub fn connect(config: &BoardConfig) -> AppResult<Self> {
        let start = Instant::now();
        let client = WorkflowClient::new(&config.backend)?;
        info!(base_url = client.base_url(), "Connecting to workflow backend");
        Self::with_source(Arc::new(client), config)
            .inspect(|_| debug!("DashboardData ready in {:?}", start.elapsed()))
    }

    /// Start polling an arbitrary issue source.
    pub fn with_source(source: Arc<dyn IssueSource>, config: &BoardConfig) -> AppResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("agentboard-poll")
            .enable_all()
            .build()?;

        let poller = WorkflowPoller::spawn(
            runtime.handle(),
            source,
            config.dashboard.poll_interval(),
        );
        info!(
            interval_ms = poller.interval().as_millis() as u64,
            "Workflow poller started"
        );

        Ok(Self {
            poller: Some(poller),
            runtime: Some(runtime),
            snapshot: WorkflowSnapshot::loading(),
        })
    }

    /// Data without a backend, for tests and previews.
    pub fn offline(snapshot: WorkflowSnapshot) -> Self {
        Self {
            poller: None,
            runtime: None,
            snapshot,
        }
    }

    /// Drain pending poll events. Returns true if the snapshot changed.
    pub fn poll_updates(&mut self) -> bool {
        let Some(poller) = self.poller.as_mut() else {
            return false;
        };

        let mut changed = false;
        while let Some(event) = poller.try_next_event() {
            changed |= self.snapshot.apply(event);
        }
        changed
    }

    /// Ask the poller for an immediate fetch.
    pub fn refresh_now(&self) {
        if let Some(poller) = &self.poller {
            poller.refresh_now();
        }
    }

    /// Returns true while a backend poller is attached and running.
    pub fn is_live(&self) -> bool {
        self.runtime.is_some() && self.poller.as_ref().is_some_and(|p| !p.is_stopped())
    }

    pub fn snapshot(&self) -> &WorkflowSnapshot {
        &self.snapshot
    }

    /// Replace the snapshot directly.
    pub fn set_snapshot(&mut self, snapshot: WorkflowSnapshot) {
        self.snapshot = snapshot;
    }
}
