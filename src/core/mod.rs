/*!
 * Core Module
 * Fundamental harness types and error handling
 */

pub mod errors;
pub mod types;

// Re-export for convenience
pub use errors::HarnessError;
pub use types::{HarnessResult, Pid};
