//! Issue filters and alert classification.
//!
//! Alert predicates are evaluated once per issue into [`AlertFlags`]; filters,
//! alert counts and cards all read those flags so they cannot drift apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::types::IssueRecord;

/// Quality scores strictly below this count as low quality.
pub const LOW_SONAR_THRESHOLD: f64 = 70.0;

/// Quality assumed when an issue reports none, so missing data never alerts.
pub const MISSING_SONAR_DEFAULT: f64 = 100.0;

/// The three alert categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    /// A pull request exists
    PrReady,
    /// Fewer tests passed than ran
    FailedTests,
    /// Quality score under [`LOW_SONAR_THRESHOLD`]
    LowSonar,
}

impl AlertKind {
    /// All alert kinds in panel order.
    pub const ALL: [AlertKind; 3] = [AlertKind::PrReady, AlertKind::FailedTests, AlertKind::LowSonar];

    /// Panel heading.
    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::PrReady => "PR Ready",
            AlertKind::FailedTests => "Test Failures",
            AlertKind::LowSonar => "Low Sonar",
        }
    }

    /// Short badge shown on issue cards.
    pub fn badge(&self) -> &'static str {
        match self {
            AlertKind::PrReady => "PR Ready",
            AlertKind::FailedTests => "Test Fail",
            AlertKind::LowSonar => "Low Sonar",
        }
    }

    /// One-line description of an issue inside this alert bucket.
    pub fn describe(&self, issue: &IssueRecord) -> String {
        match self {
            AlertKind::PrReady => format!(
                "Issue {}: {}",
                issue.issue_id,
                issue.pr_link().unwrap_or_default()
            ),
            AlertKind::FailedTests => format!(
                "Issue {}: {}/{} tests passed",
                issue.issue_id,
                issue.passed(),
                issue.total()
            ),
            AlertKind::LowSonar => format!(
                "Issue {}: {}% quality",
                issue.issue_id,
                issue.quality()
            ),
        }
    }
}

/// Alert classification of one issue. Buckets are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFlags {
    pub pr_ready: bool,
    pub failed_tests: bool,
    pub low_sonar: bool,
}

impl AlertFlags {
    /// Evaluate all three alert predicates for an issue.
    pub fn classify(issue: &IssueRecord) -> Self {
        Self {
            pr_ready: issue.has_pr(),
            failed_tests: issue.tests_passed.unwrap_or(0) < issue.tests_total.unwrap_or(0),
            low_sonar: issue.sonar_quality.unwrap_or(MISSING_SONAR_DEFAULT) < LOW_SONAR_THRESHOLD,
        }
    }

    /// Whether the issue falls into the given bucket.
    pub fn has(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::PrReady => self.pr_ready,
            AlertKind::FailedTests => self.failed_tests,
            AlertKind::LowSonar => self.low_sonar,
        }
    }

    /// Buckets this issue belongs to, in panel order.
    pub fn kinds(&self) -> impl Iterator<Item = AlertKind> + '_ {
        AlertKind::ALL.into_iter().filter(|k| self.has(*k))
    }

    /// Returns true if the issue is in no bucket.
    pub fn is_clear(&self) -> bool {
        !(self.pr_ready || self.failed_tests || self.low_sonar)
    }
}

/// Per-bucket issue counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCounts {
    pub pr_ready: usize,
    pub failed_tests: usize,
    pub low_sonar: usize,
}

impl AlertCounts {
    /// Add one issue's flags to the counts.
    pub fn record(&mut self, flags: AlertFlags) {
        self.pr_ready += usize::from(flags.pr_ready);
        self.failed_tests += usize::from(flags.failed_tests);
        self.low_sonar += usize::from(flags.low_sonar);
    }

    /// Count for one bucket.
    pub fn get(&self, kind: AlertKind) -> usize {
        match kind {
            AlertKind::PrReady => self.pr_ready,
            AlertKind::FailedTests => self.failed_tests,
            AlertKind::LowSonar => self.low_sonar,
        }
    }
}

/// Which subset of issues is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueFilter {
    #[default]
    All,
    PrReady,
    FailedTests,
    LowSonar,
}

impl IssueFilter {
    /// All filters in selector order.
    pub const ALL: [IssueFilter; 4] = [
        IssueFilter::All,
        IssueFilter::PrReady,
        IssueFilter::FailedTests,
        IssueFilter::LowSonar,
    ];

    /// Whether an issue with these flags passes the filter.
    pub fn matches(&self, flags: &AlertFlags) -> bool {
        match self {
            IssueFilter::All => true,
            IssueFilter::PrReady => flags.pr_ready,
            IssueFilter::FailedTests => flags.failed_tests,
            IssueFilter::LowSonar => flags.low_sonar,
        }
    }

    /// Button label.
    pub fn title(&self) -> &'static str {
        match self {
            IssueFilter::All => "All",
            IssueFilter::PrReady => AlertKind::PrReady.title(),
            IssueFilter::FailedTests => AlertKind::FailedTests.title(),
            IssueFilter::LowSonar => AlertKind::LowSonar.title(),
        }
    }

    /// Wire name (`all`, `prReady`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            IssueFilter::All => "all",
            IssueFilter::PrReady => "prReady",
            IssueFilter::FailedTests => "failedTests",
            IssueFilter::LowSonar => "lowSonar",
        }
    }

    /// Next filter in selector order, wrapping around.
    pub fn next(&self) -> IssueFilter {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for IssueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IssueFilter {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(IssueFilter::All),
            "prReady" | "pr-ready" | "pr_ready" => Ok(IssueFilter::PrReady),
            "failedTests" | "failed-tests" | "failed_tests" => Ok(IssueFilter::FailedTests),
            "lowSonar" | "low-sonar" | "low_sonar" => Ok(IssueFilter::LowSonar),
            other => Err(BoardError::UnknownFilter {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(passed: Option<u64>, total: Option<u64>, sonar: Option<f64>) -> IssueRecord {
        let mut record = IssueRecord::new("1", "coded");
        record.tests_passed = passed;
        record.tests_total = total;
        record.sonar_quality = sonar;
        record
    }

    #[test]
    fn test_failed_tests_predicate() {
        assert!(AlertFlags::classify(&issue(Some(8), Some(10), None)).failed_tests);
        assert!(!AlertFlags::classify(&issue(Some(10), Some(10), None)).failed_tests);
        assert!(AlertFlags::classify(&issue(None, Some(3), None)).failed_tests);
        // No test data is never a failure
        assert!(!AlertFlags::classify(&issue(None, Some(0), None)).failed_tests);
        assert!(!AlertFlags::classify(&issue(None, None, None)).failed_tests);
    }

    #[test]
    fn test_low_sonar_predicate() {
        assert!(AlertFlags::classify(&issue(None, None, Some(65.0))).low_sonar);
        assert!(AlertFlags::classify(&issue(None, None, Some(0.0))).low_sonar);
        assert!(!AlertFlags::classify(&issue(None, None, Some(70.0))).low_sonar);
        // No quality data is never low quality
        assert!(!AlertFlags::classify(&issue(None, None, None)).low_sonar);
    }

    #[test]
    fn test_buckets_are_independent() {
        let mut record = issue(Some(1), Some(2), Some(10.0));
        record.pr_url = Some("https://example.com/pr/1".into());
        let flags = AlertFlags::classify(&record);
        assert_eq!(
            flags.kinds().collect::<Vec<_>>(),
            vec![AlertKind::PrReady, AlertKind::FailedTests, AlertKind::LowSonar]
        );
        assert!(!flags.is_clear());
    }

    #[test]
    fn test_all_optional_fields_missing_is_clear() {
        let flags = AlertFlags::classify(&IssueRecord::new("1", "planned"));
        assert!(flags.is_clear());
        for filter in [IssueFilter::PrReady, IssueFilter::FailedTests, IssueFilter::LowSonar] {
            assert!(!filter.matches(&flags));
        }
        assert!(IssueFilter::All.matches(&flags));
    }

    #[test]
    fn test_alert_counts_record() {
        let mut counts = AlertCounts::default();
        counts.record(AlertFlags {
            pr_ready: true,
            failed_tests: true,
            low_sonar: false,
        });
        counts.record(AlertFlags {
            pr_ready: true,
            ..Default::default()
        });
        assert_eq!(counts.get(AlertKind::PrReady), 2);
        assert_eq!(counts.get(AlertKind::FailedTests), 1);
        assert_eq!(counts.get(AlertKind::LowSonar), 0);
    }

    #[test]
    fn test_describe() {
        let record = issue(Some(8), Some(10), Some(65.0));
        assert_eq!(
            AlertKind::FailedTests.describe(&record),
            "Issue 1: 8/10 tests passed"
        );
        assert_eq!(AlertKind::LowSonar.describe(&record), "Issue 1: 65% quality");
    }

    #[test]
    fn test_filter_parse_and_cycle() {
        assert_eq!("prReady".parse::<IssueFilter>().unwrap(), IssueFilter::PrReady);
        assert_eq!("low-sonar".parse::<IssueFilter>().unwrap(), IssueFilter::LowSonar);
        assert!("bogus".parse::<IssueFilter>().is_err());

        assert_eq!(IssueFilter::All.next(), IssueFilter::PrReady);
        assert_eq!(IssueFilter::LowSonar.next(), IssueFilter::All);
        assert_eq!(IssueFilter::FailedTests.to_string(), "failedTests");
    }

    #[test]
    fn test_filter_serializes_camel_case() {
        let json = serde_json::to_string(&IssueFilter::FailedTests).unwrap();
        assert_eq!(json, "\"failedTests\"");
    }
}
