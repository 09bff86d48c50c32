//! # agentboard-core
//!
//! Core types, derived views, errors, and logging for agentboard.
//!
//! This crate provides:
//! - [`IssueRecord`] and [`Stage`] - the issue payload and the five canonical stages
//! - [`DerivedView`] - filtered issues, alert counts and stage summaries
//! - [`BoardError`] - error type for configuration, I/O, and terminal failures
//! - [`logging`] - tracing setup and log file locations
//!
//! ## Example
//!
//! ```
//! use agentboard_core::{DerivedView, IssueFilter, IssueRecord};
//!
//! let mut issue = IssueRecord::new("ISSUE-1", "coded");
//! issue.fsm_history = vec!["planned".into(), "coded".into()];
//! issue.sonar_quality = Some(65.0);
//!
//! let view = DerivedView::compute(&[issue], IssueFilter::LowSonar);
//! assert_eq!(view.alert_counts.low_sonar, 1);
//! assert_eq!(view.filtered_issues[0].completion_percent, 40);
//! ```

pub mod error;
pub mod filter;
pub mod logging;
pub mod summary;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use error::{BoardError, Result};
pub use filter::{AlertCounts, AlertFlags, AlertKind, IssueFilter};
pub use logging::{init_logging, LogGuard};
pub use summary::{stage_summary, StageSummary};
pub use types::{IssueId, IssueRecord, Stage, STAGE_COUNT};
pub use view::{DerivedView, IssueView};
