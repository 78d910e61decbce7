/*!
 * exec-harness - Main Entry Point
 *
 * Smoke-test harness for guest binaries:
 * - Preflight the target file
 * - Spawn it as a child process
 * - Wait for termination (with a deadline)
 * - Report a structured outcome
 */

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use exec_harness::{init_tracing, HarnessConfig, Runner};

fn main() -> Result<()> {
    // Initialize structured tracing
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;

    info!("exec-harness starting");
    info!(targets = config.targets.len(), "suite loaded");

    let runner = Runner::new();
    let suite = runner.run_suite(&config);

    let emit_json = std::env::var("HARNESS_REPORT_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);
    if emit_json {
        let json = suite.to_json().context("failed to serialize suite report")?;
        println!("{}", json);
    } else {
        for report in &suite.reports {
            println!(
                "{:<24} {:?} ({} us)",
                report.target, report.outcome, report.wall_time_micros
            );
        }
        println!("passed: {}, failed: {}", suite.passed, suite.failed);
    }

    if !suite.all_passed() {
        std::process::exit(1);
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<HarnessConfig> {
    let config = match args {
        [] => bail!("usage: harness <command> [args...] | harness --config <file.json>"),
        [flag, path] if flag.as_str() == "--config" => HarnessConfig::load(Path::new(path))
            .with_context(|| format!("failed to load config from {}", path))?,
        [flag, ..] if flag.as_str() == "--config" => {
            bail!("--config takes exactly one argument")
        }
        [command, rest @ ..] => HarnessConfig::single(command.clone(), rest.to_vec()),
    };

    let config = config
        .with_env_overrides()
        .context("invalid environment override")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
