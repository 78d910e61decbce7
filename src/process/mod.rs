/*!
 * Process Module
 * Child process spawning, supervision, and reaping
 */

pub mod executor;
pub mod types;

mod validation;

// Re-export for convenience
pub use executor::ProcessExecutor;
pub use types::{ExecutionConfig, ExitSummary};
