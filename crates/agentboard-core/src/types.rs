//! Issue records and workflow stages.
//!
//! An [`IssueRecord`] is received from the workflow backend and never written
//! back. Only `issue_id` and `fsm_state` are required; every other field falls
//! back to a safe default so missing data never looks like a failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Unique identifier for an issue.
pub type IssueId = String;

/// Number of canonical workflow stages.
pub const STAGE_COUNT: usize = 5;

/// One of the five canonical workflow stages, in completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Planner agent produced a plan
    Planned,
    /// Coder agent produced a change
    Coded,
    /// Reviewer agent reviewed the change
    Reviewed,
    /// Automated fix rounds ran
    AutoFix,
    /// Pull request opened
    PrCreated,
}

impl Stage {
    /// All canonical stages in fixed order.
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::Planned,
        Stage::Coded,
        Stage::Reviewed,
        Stage::AutoFix,
        Stage::PrCreated,
    ];

    /// Label used in `fsm_state`, `fsm_history` and `fsm_logs`.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Planned => "planned",
            Stage::Coded => "coded",
            Stage::Reviewed => "reviewed",
            Stage::AutoFix => "auto_fix",
            Stage::PrCreated => "pr_created",
        }
    }

    /// Human-readable name of the agent step behind this stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Planned => "Planner",
            Stage::Coded => "Coder",
            Stage::Reviewed => "Reviewer",
            Stage::AutoFix => "Auto-Fix",
            Stage::PrCreated => "PR Created",
        }
    }

    /// Parse a stage from its wire label.
    pub fn from_label(label: &str) -> Option<Stage> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of one tracked issue as reported by the workflow backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Opaque unique identifier
    pub issue_id: IssueId,
    /// Current stage label (open-ended set)
    pub fsm_state: String,
    /// Stage labels already completed, in completion order
    #[serde(default, deserialize_with = "null_as_default")]
    pub fsm_history: Vec<String>,
    /// Per-stage log messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fsm_logs: Option<BTreeMap<String, String>>,
    /// Free-text plan description
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan: String,
    /// Free-text overall status label
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow_status: String,
    /// Pull request URL, present once a PR exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    /// Number of automated fix iterations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix_rounds: Option<u32>,
    /// Tests passing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_passed: Option<u64>,
    /// Tests run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_total: Option<u64>,
    /// Code-quality score in [0, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sonar_quality: Option<f64>,
}

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl IssueRecord {
    /// Create a record with only the required fields set.
    pub fn new(issue_id: impl Into<IssueId>, fsm_state: impl Into<String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            fsm_state: fsm_state.into(),
            fsm_history: Vec::new(),
            fsm_logs: None,
            plan: String::new(),
            workflow_status: String::new(),
            pr_url: None,
            auto_fix_rounds: None,
            tests_passed: None,
            tests_total: None,
            sonar_quality: None,
        }
    }

    /// Returns true if a pull request URL is present and non-empty.
    pub fn has_pr(&self) -> bool {
        self.pr_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// The PR URL when [`has_pr`](Self::has_pr) holds.
    pub fn pr_link(&self) -> Option<&str> {
        self.pr_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Tests passing, 0 when unknown.
    pub fn passed(&self) -> u64 {
        self.tests_passed.unwrap_or(0)
    }

    /// Tests run, 0 when unknown.
    pub fn total(&self) -> u64 {
        self.tests_total.unwrap_or(0)
    }

    /// Tests failing, never negative even when the backend reports passed > total.
    pub fn failed(&self) -> u64 {
        self.total().saturating_sub(self.passed())
    }

    /// Quality score for display, 0 when unknown.
    pub fn quality(&self) -> f64 {
        self.sonar_quality.unwrap_or(0.0)
    }

    /// Returns true if `stage` appears in the completed history.
    pub fn has_completed(&self, stage: Stage) -> bool {
        self.fsm_history
            .iter()
            .any(|label| Stage::from_label(label) == Some(stage))
    }

    /// Percentage of the five canonical stages completed.
    ///
    /// Counts raw history entries: duplicates and non-canonical labels are
    /// counted too, so the result can exceed 100.
    pub fn completion_percent(&self) -> usize {
        self.fsm_history.len() * 100 / STAGE_COUNT
    }

    /// Log message for a stage, shown only once that stage is completed.
    pub fn stage_log(&self, stage: Stage) -> Option<&str> {
        if !self.has_completed(stage) {
            return None;
        }
        self.fsm_logs
            .as_ref()
            .and_then(|logs| logs.get(stage.label()))
            .map(String::as_str)
    }
}
