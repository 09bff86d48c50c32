//! Derived view state computed from an issue list and a filter.
//!
//! [`DerivedView::compute`] is pure and deterministic: the same issues and
//! filter always produce an equal view. It is recomputed in full on every fetch
//! and every filter change.

use serde::{Deserialize, Serialize};

use crate::filter::{AlertCounts, AlertFlags, AlertKind, IssueFilter};
use crate::summary::StageSummary;
use crate::types::{IssueRecord, Stage};

/// One visible issue with its classification computed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueView {
    pub record: IssueRecord,
    pub alerts: AlertFlags,
    pub completion_percent: usize,
}

impl IssueView {
    /// Classify a record.
    pub fn new(record: IssueRecord) -> Self {
        let alerts = AlertFlags::classify(&record);
        let completion_percent = record.completion_percent();
        Self {
            record,
            alerts,
            completion_percent,
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    pub filter: IssueFilter,
    /// Issues passing `filter`, input order preserved
    pub filtered_issues: Vec<IssueView>,
    /// Bucket counts over `filtered_issues`
    pub alert_counts: AlertCounts,
    /// Per-stage aggregates over `filtered_issues`
    pub stage_summary: Vec<StageSummary>,
}

impl DerivedView {
    /// Compute the view for `issues` under `filter`.
    pub fn compute(issues: &[IssueRecord], filter: IssueFilter) -> Self {
        let filtered_issues: Vec<IssueView> = issues
            .iter()
            .cloned()
            .map(IssueView::new)
            .filter(|view| filter.matches(&view.alerts))
            .collect();

        let mut alert_counts = AlertCounts::default();
        for view in &filtered_issues {
            alert_counts.record(view.alerts);
        }

        let stage_summary = Stage::ALL
            .into_iter()
            .map(|stage| StageSummary::compute(stage, filtered_issues.iter().map(|v| &v.record)))
            .collect();

        Self {
            filter,
            filtered_issues,
            alert_counts,
            stage_summary,
        }
    }

    /// Visible issues in one alert bucket, for the alert panel.
    pub fn alert_entries(&self, kind: AlertKind) -> impl Iterator<Item = &IssueView> {
        self.filtered_issues.iter().filter(move |v| v.alerts.has(kind))
    }

    /// Summary row for a stage.
    pub fn summary_for(&self, stage: Stage) -> Option<&StageSummary> {
        self.stage_summary.iter().find(|s| s.stage == stage)
    }

    /// Number of visible issues.
    pub fn len(&self) -> usize {
        self.filtered_issues.len()
    }

    /// Returns true if no issue is visible.
    pub fn is_empty(&self) -> bool {
        self.filtered_issues.is_empty()
    }
}
