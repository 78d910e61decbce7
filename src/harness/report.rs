/*!
 * Run Reports
 * Structured outcomes for target runs and suites
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a single target run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Exited with the expected code
    Passed,
    /// Exited cleanly but with the wrong code
    Failed { code: i32 },
    /// Terminated by a signal
    Signaled,
    /// Killed after exceeding its deadline
    TimedOut,
    /// Preflight, spawn, or wait failure
    Error { message: String },
}

impl RunOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, RunOutcome::Passed)
    }
}

/// Report for one target run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunReport {
    pub run_id: String,
    pub target: String,
    pub command: String,
    pub outcome: RunOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub wall_time_micros: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl RunReport {
    pub fn new(target: String, command: String, outcome: RunOutcome) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            target,
            command,
            outcome,
            exit_code: None,
            wall_time_micros: 0,
            stdout: None,
            stderr: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_pass()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Aggregated reports for a whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SuiteReport {
    pub reports: Vec<RunReport>,
    pub passed: usize,
    pub failed: usize,
}

impl SuiteReport {
    pub fn from_reports(reports: Vec<RunReport>) -> Self {
        let passed = reports.iter().filter(|r| r.passed()).count();
        let failed = reports.len() - passed;
        Self {
            reports,
            passed,
            failed,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_serialization_shape() {
        let json = serde_json::to_value(&RunOutcome::Failed { code: 3 }).unwrap();
        assert_eq!(json["kind"], "failed");
        assert_eq!(json["code"], 3);

        let json = serde_json::to_value(&RunOutcome::Passed).unwrap();
        assert_eq!(json["kind"], "passed");
    }

    #[test]
    fn test_report_skips_empty_fields() {
        let report = RunReport::new(
            "shell".to_string(),
            "/root/shell.elf".to_string(),
            RunOutcome::Passed,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("exit_code").is_none());
        assert!(json.get("stdout").is_none());
        assert!(json.get("stderr").is_none());
    }

    #[test]
    fn test_suite_counts() {
        let reports = vec![
            RunReport::new("a".into(), "true".into(), RunOutcome::Passed),
            RunReport::new("b".into(), "false".into(), RunOutcome::Failed { code: 1 }),
            RunReport::new("c".into(), "sleep".into(), RunOutcome::TimedOut),
        ];
        let suite = SuiteReport::from_reports(reports);
        assert_eq!(suite.passed, 1);
        assert_eq!(suite.failed, 2);
        assert!(!suite.all_passed());
    }

    #[test]
    fn test_report_roundtrip() {
        let mut report = RunReport::new(
            "shell".to_string(),
            "/root/shell.elf".to_string(),
            RunOutcome::Failed { code: 2 },
        );
        report.exit_code = Some(2);
        report.wall_time_micros = 1234;

        let json = report.to_json().unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.outcome, RunOutcome::Failed { code: 2 });
        assert_eq!(back.exit_code, Some(2));
        assert_eq!(back.wall_time_micros, 1234);
    }
}
