/*!
 * Process Command Validation
 * Security validation for harness commands and arguments
 */

use crate::core::{HarnessError, HarnessResult};

/// Validate command for security issues
pub(super) fn validate_command(command: &str) -> HarnessResult<()> {
    if command.trim().is_empty() {
        return Err(HarnessError::InvalidCommand(
            "Command cannot be empty".to_string(),
        ));
    }

    // The harness never goes through a shell, but a command that needs
    // shell metacharacters to mean anything is a config mistake.
    let dangerous_chars = [';', '|', '&', '\n', '\r', '\0', '`', '$', '(', ')'];
    if dangerous_chars.iter().any(|&c| command.contains(c)) {
        return Err(HarnessError::InvalidCommand(
            "Command contains shell metacharacters".to_string(),
        ));
    }

    if command.contains("..") {
        return Err(HarnessError::InvalidCommand(
            "Command contains path traversal".to_string(),
        ));
    }

    Ok(())
}

/// Validate a command argument
///
/// Arguments are opaque to the target, so only bytes the OS itself
/// cannot pass through an argv are rejected.
pub(super) fn validate_argument(arg: &str) -> HarnessResult<()> {
    if arg.contains('\0') {
        return Err(HarnessError::InvalidCommand(
            "Argument contains NUL byte".to_string(),
        ));
    }
    Ok(())
}
