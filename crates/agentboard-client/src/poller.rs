//! Background issue polling.
//!
//! The poller fetches once immediately, then on every interval tick, plus
//! whenever [`WorkflowPoller::refresh_now`] is called. Fetches are not
//! deduplicated: each one runs as its own task and reports over the event
//! channel, so the last result to resolve is the one the consumer ends on.

use std::sync::Arc;
use std::time::Duration;

use agentboard_core::IssueRecord;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, Notify};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::client::IssueSource;
use crate::error::ClientError;

/// Outcome of one fetch.
#[derive(Debug)]
pub enum PollEvent {
    /// Full issue list from the backend
    Issues(Vec<IssueRecord>),
    /// The fetch failed
    Failed(ClientError),
}

impl From<crate::Result<Vec<IssueRecord>>> for PollEvent {
    fn from(result: crate::Result<Vec<IssueRecord>>) -> Self {
        match result {
            Ok(issues) => PollEvent::Issues(issues),
            Err(err) => PollEvent::Failed(err),
        }
    }
}

/// Handle to a running poll task. Dropping it stops polling.
pub struct WorkflowPoller {
    task: JoinHandle<()>,
    refresh: Arc<Notify>,
    events: mpsc::UnboundedReceiver<PollEvent>,
    interval: Duration,
}

impl WorkflowPoller {
    /// Start polling `source` every `interval` on the given runtime.
    pub fn spawn(handle: &Handle, source: Arc<dyn IssueSource>, interval: Duration) -> Self {
        info!(interval_ms = interval.as_millis() as u64, "Starting issue poller");

        let (tx, events) = mpsc::unbounded_channel();
        let refresh = Arc::new(Notify::new());
        let task = handle.spawn(run_loop(source, interval, Arc::clone(&refresh), tx));

        Self {
            task,
            refresh,
            events,
            interval,
        }
    }

    /// Request an extra fetch without waiting for the next tick.
    pub fn refresh_now(&self) {
        debug!("manual refresh requested");
        self.refresh.notify_one();
    }

    /// Cancel the poll task and any fetch still in flight.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Returns true once the poll task has exited.
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next queued event, if any, without blocking.
    pub fn try_next_event(&mut self) -> Option<PollEvent> {
        self.events.try_recv().ok()
    }

    /// Wait for the next event. Returns `None` after the poller has stopped
    /// and every queued event has been consumed.
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        self.events.recv().await
    }
}

impl Drop for WorkflowPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(
    source: Arc<dyn IssueSource>,
    interval: Duration,
    refresh: Arc<Notify>,
    tx: mpsc::UnboundedSender<PollEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Dropped with this future, which aborts fetches still running
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => {}
            _ = tx.closed() => {
                debug!("event receiver dropped, stopping poller");
                break;
            }
        }

        while in_flight.try_join_next().is_some() {}

        let source = Arc::clone(&source);
        let tx = tx.clone();
        in_flight.spawn(async move {
            let event = PollEvent::from(source.fetch_issues().await);
            let _ = tx.send(event);
        });
    }
}
