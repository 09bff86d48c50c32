//! Per-stage aggregates for the workflow summary chart.

use serde::{Deserialize, Serialize};

use crate::types::{IssueRecord, Stage};

/// Aggregate metrics for the issues that have completed one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub stage: Stage,
    /// Issues whose history contains this stage
    pub count: usize,
    /// Sum of tests passed over those issues
    pub passed_tests: u64,
    /// Sum of tests run minus `passed_tests`, floored at 0
    pub failed_tests: u64,
    /// Mean quality score (missing counts as 0), one decimal place; 0 when empty
    pub avg_sonar: f64,
}

impl StageSummary {
    /// Aggregate one stage over a set of issues.
    ///
    /// Membership is "stage appears in `fsm_history`", not "current state equals".
    pub fn compute<'a, I>(stage: Stage, issues: I) -> Self
    where
        I: IntoIterator<Item = &'a IssueRecord>,
    {
        let mut count = 0usize;
        let mut passed = 0u64;
        let mut total = 0u64;
        let mut sonar_sum = 0.0f64;

        for issue in issues.into_iter().filter(|i| i.has_completed(stage)) {
            count += 1;
            passed += issue.passed();
            total += issue.total();
            sonar_sum += issue.quality();
        }

        let avg_sonar = if count == 0 {
            0.0
        } else {
            round_one_decimal(sonar_sum / count as f64)
        };

        Self {
            stage,
            count,
            passed_tests: passed,
            failed_tests: total.saturating_sub(passed),
            avg_sonar,
        }
    }
}

/// Summaries for all five canonical stages, in fixed order.
pub fn stage_summary(issues: &[IssueRecord]) -> Vec<StageSummary> {
    Stage::ALL
        .into_iter()
        .map(|stage| StageSummary::compute(stage, issues))
        .collect()
}

/// Round to one decimal place the way a fixed-point display does: nearest
/// on the exact binary value, with ties away from zero.
fn round_one_decimal(value: f64) -> f64 {
    if value < 0.0 {
        return -round_one_decimal(-value);
    }
    // x.25 and x.75 are the only exact ties; formatting would round them to even.
    if (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0 {
        return (value * 10.0).ceil() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str, history: &[&str], passed: u64, total: u64, sonar: Option<f64>) -> IssueRecord {
        let mut record = IssueRecord::new(id, history.last().copied().unwrap_or("planned"));
        record.fsm_history = history.iter().map(|s| s.to_string()).collect();
        record.tests_passed = Some(passed);
        record.tests_total = Some(total);
        record.sonar_quality = sonar;
        record
    }

    #[test]
    fn test_empty_stage_has_zero_average() {
        let summary = StageSummary::compute(Stage::Reviewed, &[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.avg_sonar, 0.0);
        assert!(!summary.avg_sonar.is_nan());
    }

    #[test]
    fn test_membership_uses_history_not_state() {
        let issues = vec![issue("1", &["planned", "coded"], 8, 10, Some(65.0))];
        let planned = StageSummary::compute(Stage::Planned, &issues);
        assert_eq!(planned.count, 1);
        let coded = StageSummary::compute(Stage::Coded, &issues);
        assert_eq!(coded.count, 1);
        assert_eq!(coded.passed_tests, 8);
        assert_eq!(coded.failed_tests, 2);
        assert_eq!(coded.avg_sonar, 65.0);
    }

    #[test]
    fn test_missing_quality_counts_as_zero_in_average() {
        let issues = vec![
            issue("1", &["planned"], 0, 0, Some(90.0)),
            issue("2", &["planned"], 0, 0, None),
            issue("3", &["planned"], 0, 0, Some(85.0)),
        ];
        let summary = StageSummary::compute(Stage::Planned, &issues);
        assert_eq!(summary.count, 3);
        // (90 + 0 + 85) / 3 = 58.333...
        assert_eq!(summary.avg_sonar, 58.3);
    }

    #[test]
    fn test_rounding_uses_exact_value() {
        // 1.45 is stored just below the midpoint
        assert_eq!(round_one_decimal(1.45), 1.4);
        assert_eq!(round_one_decimal(0.25), 0.3);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(2.5), 2.5);
        assert_eq!(round_one_decimal(99.96), 100.0);
        assert_eq!(round_one_decimal(-0.25), -0.3);
    }

    #[test]
    fn test_average_rounding_near_midpoint() {
        let below = vec![
            issue("1", &["coded"], 0, 0, Some(1.4)),
            issue("2", &["coded"], 0, 0, Some(1.5)),
        ];
        assert_eq!(StageSummary::compute(Stage::Coded, &below).avg_sonar, 1.4);

        let tie = vec![
            issue("1", &["coded"], 0, 0, Some(0.0)),
            issue("2", &["coded"], 0, 0, Some(0.5)),
        ];
        assert_eq!(StageSummary::compute(Stage::Coded, &tie).avg_sonar, 0.3);
    }

    #[test]
    fn test_failed_tests_floor_at_zero() {
        let issues = vec![issue("1", &["planned"], 12, 10, None)];
        let summary = StageSummary::compute(Stage::Planned, &issues);
        assert_eq!(summary.passed_tests, 12);
        assert_eq!(summary.failed_tests, 0);
    }

    #[test]
    fn test_stage_summary_order() {
        let stages: Vec<Stage> = stage_summary(&[]).iter().map(|s| s.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let value = serde_json::to_value(StageSummary::compute(Stage::AutoFix, &[])).unwrap();
        assert_eq!(value["stage"], "auto_fix");
        assert!(value.get("passedTests").is_some());
        assert!(value.get("avgSonar").is_some());
    }
}
