/*!
 * Harness Module
 * Target preflight, the smoke runner, and run reports
 */

pub mod preflight;
pub mod report;
pub mod runner;

// Re-export for convenience
pub use preflight::TargetInfo;
pub use report::{RunOutcome, RunReport, SuiteReport};
pub use runner::Runner;
