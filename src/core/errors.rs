/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::Pid;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Harness errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum HarnessError {
    #[error("Target not found: {0}")]
    #[diagnostic(
        code(harness::target_not_found),
        help("Check that the target path exists and is spelled correctly.")
    )]
    TargetNotFound(String),

    #[error("Target not executable: {0}")]
    #[diagnostic(
        code(harness::target_not_executable),
        help("The target must be a non-empty regular file with execute permission.")
    )]
    TargetNotExecutable(String),

    #[error("Invalid command: {0}")]
    #[diagnostic(
        code(harness::invalid_command),
        help("Commands must be non-empty and free of shell metacharacters.")
    )]
    InvalidCommand(String),

    #[error("Spawn failed: {0}")]
    #[diagnostic(
        code(harness::spawn_failed),
        help("Check system resources and permissions. View logs for details.")
    )]
    SpawnFailed(String),

    #[error("Wait failed: {0}")]
    #[diagnostic(
        code(harness::wait_failed),
        help("The child may have been reaped elsewhere. View logs for details.")
    )]
    WaitFailed(String),

    #[error("Process {0} not found")]
    #[diagnostic(
        code(harness::process_not_found),
        help("The process may have already been waited on or killed. Each pid is consumed once.")
    )]
    ProcessNotFound(Pid),

    #[error("Target timed out after {0} ms")]
    #[diagnostic(
        code(harness::timeout),
        help("The child was killed after exceeding its deadline. Raise the target's timeout if this is expected.")
    )]
    Timeout(u64),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(harness::io),
        help("The underlying filesystem or pipe operation failed. View logs for details.")
    )]
    Io(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(harness::config),
        help("Check the harness configuration file and environment overrides.")
    )]
    Config(String),
}
