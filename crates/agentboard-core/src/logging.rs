//! Logging infrastructure for agentboard.
//!
//! Structured logging using the `tracing` ecosystem. The dashboard writes JSON
//! lines to a daily-rolled file under `~/.agentboard/logs/`; the console layer is
//! only installed for non-interactive commands since the TUI owns the terminal.
//!
//! ## Example
//!
//! ```no_run
//! use agentboard_core::logging;
//!
//! let _guard = logging::init_logging(None, false, true).expect("logging init");
//!
//! tracing::info!("agentboard started");
//! tracing::debug!(issue_id = "ISSUE-1", "rendering card");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::error::{BoardError, Result};

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the agentboard logging system.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.agentboard/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
/// * `console` - If true, also logs human-readable lines to stderr.
///
/// # Returns
///
/// A [`LogGuard`] that must be held for the application lifetime so buffered
/// file output is flushed on exit.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool, console: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| BoardError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "agentboard.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("agentboard={default_level}")));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(verbose)
            .with_line_number(verbose)
            .compact()
            .boxed()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, console, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Get the agentboard home directory (`~/.agentboard/`).
pub fn agentboard_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| BoardError::Internal {
        message: "HOME environment variable not set".into(),
    })?;

    Ok(PathBuf::from(home).join(".agentboard"))
}

/// Get the default log directory path (`~/.agentboard/logs/`).
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(agentboard_home()?.join("logs"))
}

/// Log a poll outcome with a consistent target.
///
/// ```ignore
/// log_poll_event!("fetched", issues = 12);
/// log_poll_event!("failed", error = %err);
/// ```
#[macro_export]
macro_rules! log_poll_event {
    ($event:expr) => {
        tracing::debug!(
            target: "agentboard::poll",
            event = $event,
            "poll event"
        )
    };
    ($event:expr, $($field:tt)*) => {
        tracing::debug!(
            target: "agentboard::poll",
            event = $event,
            $($field)*,
            "poll event"
        )
    };
}
