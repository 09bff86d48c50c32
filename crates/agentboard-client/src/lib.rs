//! # agentboard-client
//!
//! Talks to the workflow backend and keeps a live snapshot of its issues.
//!
//! - [`WorkflowClient`] - `GET /api/issues` and `POST /run_tasks`
//! - [`WorkflowPoller`] - cancellable periodic fetch with manual refresh
//! - [`WorkflowSnapshot`] - loading / error / ready state folded from poll events

pub mod client;
pub mod error;
pub mod poller;
pub mod snapshot;

pub use client::{IssueSource, RunTasksRequest, RunTasksResponse, WorkflowClient};
pub use error::{ClientError, Result, GENERIC_ERROR_MESSAGE};
pub use poller::{PollEvent, WorkflowPoller};
pub use snapshot::{ErrorInfo, SnapshotStatus, WorkflowSnapshot};
