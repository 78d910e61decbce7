/*!
 * Smoke Runner
 * Drives the spawn-then-wait sequence for each target and classifies
 * the result
 */

use super::preflight;
use super::report::{RunOutcome, RunReport, SuiteReport};
use crate::config::{HarnessConfig, TargetSpec};
use crate::core::HarnessError;
use crate::process::{ExecutionConfig, ExitSummary, ProcessExecutor};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;
use tracing::{error, info, warn};

/// Runs smoke targets one at a time, in declaration order
pub struct Runner {
    executor: ProcessExecutor,
    next_pid: AtomicU32,
}

impl Runner {
    pub fn new() -> Self {
        Self {
            executor: ProcessExecutor::new(),
            next_pid: AtomicU32::new(1),
        }
    }

    /// Run one target end to end: preflight, spawn, wait, classify
    ///
    /// Never panics; any failure along the way becomes an `Error`
    /// outcome in the report.
    pub fn run_target(&self, config: &HarnessConfig, target: &TargetSpec) -> RunReport {
        let start = Instant::now();
        info!(target_name = %target.name, command = %target.command, "running target");

        if target.preflight && target.is_path_command() {
            if let Err(e) = preflight::inspect(Path::new(&target.command)) {
                error!(target_name = %target.name, error = %e, "preflight failed");
                return self.finish(target, RunOutcome::Error { message: e.to_string() }, None, start);
            }
        }

        let exec_config = ExecutionConfig::new(target.command.clone())
            .with_args(target.args.clone())
            .with_env(target.env.clone())
            .with_output_capture(target.capture_output);
        let exec_config = match &target.working_dir {
            Some(dir) => exec_config.with_working_dir(dir.clone()),
            None => exec_config,
        };

        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.executor.spawn(pid, target.name.clone(), exec_config) {
            error!(target_name = %target.name, error = %e, "spawn failed");
            return self.finish(target, RunOutcome::Error { message: e.to_string() }, None, start);
        }

        match self.executor.wait_timeout(pid, config.timeout_for(target)) {
            Ok(summary) => {
                let outcome = classify(target, &summary);
                self.finish(target, outcome, Some(summary), start)
            }
            Err(HarnessError::Timeout(ms)) => {
                warn!(target_name = %target.name, timeout_ms = ms, "target timed out");
                self.finish(target, RunOutcome::TimedOut, None, start)
            }
            Err(e) => {
                error!(target_name = %target.name, error = %e, "wait failed");
                self.finish(target, RunOutcome::Error { message: e.to_string() }, None, start)
            }
        }
    }

    /// Run every target in the suite, in declaration order
    ///
    /// Each child is fully reaped before the next target starts, the
    /// way the original smoke programs chain exec and wait.
    pub fn run_suite(&self, config: &HarnessConfig) -> SuiteReport {
        let reports = config
            .targets
            .iter()
            .map(|target| self.run_target(config, target))
            .collect();

        let suite = SuiteReport::from_reports(reports);
        info!(
            passed = suite.passed,
            failed = suite.failed,
            "suite finished"
        );
        suite
    }

    fn finish(
        &self,
        target: &TargetSpec,
        outcome: RunOutcome,
        summary: Option<ExitSummary>,
        start: Instant,
    ) -> RunReport {
        let mut report = RunReport::new(target.name.clone(), target.command.clone(), outcome);
        report.wall_time_micros = start.elapsed().as_micros() as u64;
        if let Some(summary) = summary {
            report.exit_code = summary.code;
            report.stdout = summary.stdout;
            report.stderr = summary.stderr;
        }

        match &report.outcome {
            RunOutcome::Passed => {
                info!(target_name = %target.name, wall_micros = report.wall_time_micros, "target passed")
            }
            outcome => {
                warn!(target_name = %target.name, outcome = ?outcome, "target did not pass")
            }
        }

        report
    }
}

fn classify(target: &TargetSpec, summary: &ExitSummary) -> RunOutcome {
    match summary.code {
        Some(code) if code == target.expected_exit => RunOutcome::Passed,
        Some(code) => RunOutcome::Failed { code },
        None => RunOutcome::Signaled,
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suite(targets: Vec<TargetSpec>) -> HarnessConfig {
        HarnessConfig {
            default_timeout_secs: 10,
            targets,
        }
    }

    #[test]
    fn test_passing_target() {
        let config = suite(vec![TargetSpec::new("ok".into(), "true".into())]);
        let runner = Runner::new();
        let report = runner.run_target(&config, &config.targets[0]);
        assert_eq!(report.outcome, RunOutcome::Passed);
        assert_eq!(report.exit_code, Some(0));
    }

    #[test]
    fn test_failing_target() {
        let config = suite(vec![TargetSpec::new("bad".into(), "false".into())]);
        let runner = Runner::new();
        let report = runner.run_target(&config, &config.targets[0]);
        assert_eq!(report.outcome, RunOutcome::Failed { code: 1 });
    }

    #[test]
    fn test_expected_nonzero_exit() {
        let config = suite(vec![
            TargetSpec::new("bad-is-good".into(), "false".into()).with_expected_exit(1)
        ]);
        let runner = Runner::new();
        let report = runner.run_target(&config, &config.targets[0]);
        assert_eq!(report.outcome, RunOutcome::Passed);
        assert_eq!(report.exit_code, Some(1));
    }

    #[test]
    fn test_timeout_target() {
        let config = suite(vec![
            TargetSpec::new("hang".into(), "sleep".into())
                .with_args(vec!["10".to_string()])
                .with_timeout(1),
        ]);
        let runner = Runner::new();
        let report = runner.run_target(&config, &config.targets[0]);
        assert_eq!(report.outcome, RunOutcome::TimedOut);
    }

    #[test]
    fn test_missing_path_target_is_error() {
        let config = suite(vec![TargetSpec::new(
            "ghost".into(),
            "/nonexistent/shell.elf".into(),
        )]);
        let runner = Runner::new();
        let report = runner.run_target(&config, &config.targets[0]);
        assert!(matches!(report.outcome, RunOutcome::Error { .. }));
    }

    #[test]
    fn test_suite_runs_in_order() {
        let config = suite(vec![
            TargetSpec::new("first".into(), "true".into()),
            TargetSpec::new("second".into(), "false".into()),
            TargetSpec::new("third".into(), "echo".into()).with_args(vec!["hi".to_string()]),
        ]);
        let runner = Runner::new();
        let suite_report = runner.run_suite(&config);

        let names: Vec<&str> = suite_report
            .reports
            .iter()
            .map(|r| r.target.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(suite_report.passed, 2);
        assert_eq!(suite_report.failed, 1);
        assert!(!suite_report.all_passed());
    }
}
