//! Suite reporting.
//!
//! One [`ScenarioOutcome`] per scenario run, collected into a [`SuiteReport`].
//! With [`FailureMode::FailFast`] the runner stops at the first failure and the
//! remaining scenarios are recorded as skipped.

use crate::result::LoginE2eResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Failure mode for suite execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop on first failure
    FailFast,
    /// Run every selected scenario
    #[default]
    CollectAll,
}

/// Scenario result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// All assertions held
    Passed,
    /// An assertion or interaction failed
    Failed,
    /// Not run because an earlier scenario failed in fail-fast mode
    Skipped,
}

/// Result of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Final status
    pub status: ScenarioStatus,
    /// Wall-clock time spent in the scenario
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// Failure message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScenarioOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Passed,
            duration,
            error: None,
        }
    }

    /// Create a failing outcome
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Failed,
            duration,
            error: Some(error.into()),
        }
    }

    /// Create a skipped outcome
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
        }
    }
}

/// Collected outcomes of a suite run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Outcomes in execution order
    pub scenarios: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome
    pub fn push(&mut self, outcome: ScenarioOutcome) {
        self.scenarios.push(outcome);
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.scenarios.iter().filter(|s| s.status == status).count()
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Number of skipped scenarios
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// True when at least one scenario ran and none failed or were skipped
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.scenarios.is_empty() && self.failed() == 0 && self.skipped() == 0
    }

    /// Total time across scenarios
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.scenarios.iter().map(|s| s.duration).sum()
    }

    /// Outcome of the named scenario
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    /// One-line summary, e.g. `3 passed, 1 failed, 0 skipped (1.20s)`
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped ({:.2}s)",
            self.passed(),
            self.failed(),
            self.skipped(),
            self.total_duration().as_secs_f64()
        )
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> LoginE2eResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SuiteReport {
        let mut report = SuiteReport::new();
        report.push(ScenarioOutcome::passed("a", Duration::from_millis(700)));
        report.push(ScenarioOutcome::failed(
            "b",
            Duration::from_millis(500),
            "Assertion failed: nope",
        ));
        report.push(ScenarioOutcome::skipped("c"));
        report
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_empty_report_is_not_success() {
        assert!(!SuiteReport::new().is_success());
    }

    #[test]
    fn test_all_passed_is_success() {
        let mut report = SuiteReport::new();
        report.push(ScenarioOutcome::passed("a", Duration::ZERO));
        assert!(report.is_success());
        assert_eq!(report.get("a").unwrap().status, ScenarioStatus::Passed);
        assert!(report.get("zzz").is_none());
    }

    #[test]
    fn test_summary() {
        assert_eq!(sample().summary(), "1 passed, 1 failed, 1 skipped (1.20s)");
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        let b = &json["scenarios"][1];
        assert_eq!(b["status"], "failed");
        assert_eq!(b["duration"], 500);
        assert_eq!(b["error"], "Assertion failed: nope");
        assert!(json["scenarios"][0].get("error").is_none());
    }

    #[test]
    fn test_huge_duration_saturates() {
        let mut report = SuiteReport::new();
        report.push(ScenarioOutcome::passed("slow", Duration::MAX));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["scenarios"][0]["duration"], u64::MAX);
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample();
        let back: SuiteReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_failure_mode_default() {
        assert_eq!(FailureMode::default(), FailureMode::CollectAll);
    }
}
