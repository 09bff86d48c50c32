//! Latest known state of the workflow, folded from poll events.

use agentboard_core::{log_poll_event, IssueRecord};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::ClientError;
use crate::poller::PollEvent;

/// Where the snapshot is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// No fetch has completed yet
    Loading,
    /// The most recent fetch failed
    Error,
    /// The most recent fetch succeeded
    Ready,
}

/// Details of the last failed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    /// Message shown to the user
    pub message: String,
    /// Underlying cause, for logs and the help overlay
    pub detail: String,
    pub at: DateTime<Utc>,
}

impl ErrorInfo {
    fn from_error(err: &ClientError) -> Self {
        Self {
            message: err.user_message().to_string(),
            detail: err.to_string(),
            at: Utc::now(),
        }
    }
}

/// Issue list plus fetch status.
#[derive(Debug, Clone)]
pub struct WorkflowSnapshot {
    status: SnapshotStatus,
    issues: Option<Vec<IssueRecord>>,
    error: Option<ErrorInfo>,
    last_success: Option<DateTime<Utc>>,
    revision: u64,
}

impl Default for WorkflowSnapshot {
    fn default() -> Self {
        Self::loading()
    }
}

impl WorkflowSnapshot {
    /// Snapshot before the first fetch resolves.
    pub fn loading() -> Self {
        Self {
            status: SnapshotStatus::Loading,
            issues: None,
            error: None,
            last_success: None,
            revision: 0,
        }
    }

    /// Ready snapshot holding `issues`.
    pub fn ready(issues: Vec<IssueRecord>) -> Self {
        let mut snapshot = Self::loading();
        snapshot.apply(PollEvent::Issues(issues));
        snapshot
    }

    /// Fold one poll result into the snapshot. Returns true if anything changed.
    ///
    /// A success replaces the issue list wholesale. A failure keeps the last
    /// known-good list so it stays on screen behind the error.
    pub fn apply(&mut self, event: PollEvent) -> bool {
        match event {
            PollEvent::Issues(issues) => {
                log_poll_event!("fetched", issues = issues.len());
                let changed = self.status != SnapshotStatus::Ready
                    || self.issues.as_deref() != Some(issues.as_slice());
                self.status = SnapshotStatus::Ready;
                self.issues = Some(issues);
                self.error = None;
                self.last_success = Some(Utc::now());
                if changed {
                    self.revision += 1;
                }
                changed
            }
            PollEvent::Failed(err) => {
                warn!(
                    error = %err,
                    network = err.is_network_error(),
                    server = err.is_server_error(),
                    "failed to fetch issues"
                );
                log_poll_event!("failed", error = %err);
                self.status = SnapshotStatus::Error;
                self.error = Some(ErrorInfo::from_error(&err));
                self.revision += 1;
                true
            }
        }
    }

    pub fn status(&self) -> SnapshotStatus {
        self.status
    }

    /// Returns true until the first fetch resolves.
    pub fn is_loading(&self) -> bool {
        self.status == SnapshotStatus::Loading
    }

    /// Returns true if the most recent fetch failed.
    pub fn is_error(&self) -> bool {
        self.status == SnapshotStatus::Error
    }

    /// Issues to display: the latest successful list, or empty if none yet.
    pub fn issues(&self) -> &[IssueRecord] {
        self.issues.as_deref().unwrap_or_default()
    }

    /// Returns true once any fetch has succeeded.
    pub fn has_data(&self) -> bool {
        self.issues.is_some()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    /// Time of the last successful fetch.
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    /// Counter bumped on every visible change, used to invalidate cached views.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
