/*!
 * Core Types
 * Common types used across the harness
 */

/// Internal process ID type
///
/// Allocated by the harness; distinct from the OS-level pid the
/// child receives from the host kernel.
pub type Pid = u32;

/// Common result type for harness operations
pub type HarnessResult<T> = Result<T, super::errors::HarnessError>;
