/*!
 * exec-harness Library
 * Smoke-test harness: launch target binaries as child processes, wait
 * for them, and report structured outcomes
 */

pub mod config;
pub mod core;
pub mod harness;
pub mod monitoring;
pub mod process;

// Re-exports
pub use config::{HarnessConfig, TargetSpec};
pub use crate::core::{HarnessError, HarnessResult, Pid};
pub use harness::{RunOutcome, RunReport, Runner, SuiteReport, TargetInfo};
pub use monitoring::init_tracing;
pub use process::{ExecutionConfig, ExitSummary, ProcessExecutor};
