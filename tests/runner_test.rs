/*!
 * Runner Tests
 * End-to-end smoke sequences through preflight, spawn, and wait
 */

use exec_harness::{HarnessConfig, RunOutcome, Runner, TargetSpec};
use pretty_assertions::assert_eq;
use std::io::Write;

fn suite(targets: Vec<TargetSpec>) -> HarnessConfig {
    HarnessConfig {
        default_timeout_secs: 10,
        targets,
    }
}

#[cfg(unix)]
fn write_script(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "#!/bin/sh").unwrap();
    writeln!(f, "{}", body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn test_smoke_sequence_against_guest_binary() {
    // The original program in full: exec a fixed path with one
    // argument, wait for it, succeed on exit 0
    let dir = tempfile::tempdir().unwrap();
    let guest = write_script(dir.path(), "shell.elf", "echo guest: $1");

    let config = HarnessConfig::single(
        guest.to_string_lossy().into_owned(),
        vec!["ls".to_string()],
    );
    let runner = Runner::new();
    let report = runner.run_target(&config, &config.targets[0]);

    assert_eq!(report.outcome, RunOutcome::Passed);
    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.stdout.as_deref(), Some("guest: ls\n"));
    assert!(report.wall_time_micros > 0);
}

#[cfg(unix)]
#[test]
fn test_preflight_blocks_non_executable_target() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.elf");
    std::fs::write(&path, b"\x7fELF not really").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    let config = suite(vec![TargetSpec::new(
        "data".into(),
        path.to_string_lossy().into_owned(),
    )]);
    let runner = Runner::new();
    let report = runner.run_target(&config, &config.targets[0]);

    match &report.outcome {
        RunOutcome::Error { message } => assert!(message.contains("not executable")),
        other => panic!("expected Error outcome, got {:?}", other),
    }
}

#[cfg(unix)]
#[test]
fn test_preflight_can_be_disabled() {
    // With preflight off the spawn itself reports the failure
    let config = suite(vec![{
        let mut t = TargetSpec::new("ghost".into(), "/nonexistent/shell.elf".into());
        t.preflight = false;
        t
    }]);
    let runner = Runner::new();
    let report = runner.run_target(&config, &config.targets[0]);

    match &report.outcome {
        RunOutcome::Error { message } => assert!(message.contains("Spawn failed")),
        other => panic!("expected Error outcome, got {:?}", other),
    }
}

#[test]
fn test_path_lookup_commands_skip_preflight() {
    // "true" is found via $PATH; preflight must not reject it
    let config = suite(vec![TargetSpec::new("ok".into(), "true".into())]);
    let runner = Runner::new();
    let report = runner.run_target(&config, &config.targets[0]);
    assert_eq!(report.outcome, RunOutcome::Passed);
}

#[cfg(unix)]
#[test]
fn test_suite_mixes_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_script(dir.path(), "good.elf", "exit 0");
    let bad = write_script(dir.path(), "bad.elf", "exit 3");

    let config = suite(vec![
        TargetSpec::new("good".into(), good.to_string_lossy().into_owned()),
        TargetSpec::new("bad".into(), bad.to_string_lossy().into_owned()),
        TargetSpec::new("hang".into(), "sleep".into())
            .with_args(vec!["30".to_string()])
            .with_timeout(1),
    ]);
    let runner = Runner::new();
    let suite_report = runner.run_suite(&config);

    assert_eq!(suite_report.reports[0].outcome, RunOutcome::Passed);
    assert_eq!(
        suite_report.reports[1].outcome,
        RunOutcome::Failed { code: 3 }
    );
    assert_eq!(suite_report.reports[2].outcome, RunOutcome::TimedOut);
    assert_eq!(suite_report.passed, 1);
    assert_eq!(suite_report.failed, 2);
}

#[cfg(unix)]
#[test]
fn test_chatty_target_passes_with_output() {
    // A target writing far more than a pipe buffer must still classify
    // by its exit code, not hit the deadline
    let dir = tempfile::tempdir().unwrap();
    let chatty = write_script(
        dir.path(),
        "chatty.elf",
        concat!(
            "i=0\n",
            "while [ \"$i\" -lt 5000 ]; do\n",
            "  echo xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx\n",
            "  i=$((i+1))\n",
            "done"
        ),
    );

    let config = suite(vec![TargetSpec::new(
        "chatty".into(),
        chatty.to_string_lossy().into_owned(),
    )
    .with_timeout(5)]);
    let runner = Runner::new();
    let report = runner.run_target(&config, &config.targets[0]);

    assert_eq!(report.outcome, RunOutcome::Passed);
    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.stdout.unwrap().len(), 5000 * 65);
}

#[cfg(unix)]
#[test]
fn test_signaled_target_reported() {
    let dir = tempfile::tempdir().unwrap();
    let victim = write_script(dir.path(), "victim.elf", "kill -KILL $$");

    let config = suite(vec![TargetSpec::new(
        "victim".into(),
        victim.to_string_lossy().into_owned(),
    )]);
    let runner = Runner::new();
    let report = runner.run_target(&config, &config.targets[0]);
    assert_eq!(report.outcome, RunOutcome::Signaled);
    assert_eq!(report.exit_code, None);
}

#[test]
fn test_suite_report_serializes() {
    let config = suite(vec![TargetSpec::new("ok".into(), "true".into())]);
    let runner = Runner::new();
    let suite_report = runner.run_suite(&config);

    let json = suite_report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["passed"], 1);
    assert_eq!(value["reports"][0]["outcome"]["kind"], "passed");
}
