/*!
 * Target Preflight
 * Inspects a target binary before it is handed to the executor
 */

use crate::core::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What preflight learned about a target file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TargetInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub executable: bool,
}

/// Inspect a target path before spawning it
///
/// Rejects anything the loader would reject anyway (missing file,
/// directory, empty file, no execute permission) so the failure is
/// reported as a harness diagnostic instead of a raw spawn error.
pub fn inspect(path: &Path) -> HarnessResult<TargetInfo> {
    let display = path.display().to_string();

    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HarnessError::TargetNotFound(display.clone())
        } else {
            HarnessError::Io(format!("{}: {}", display, e))
        }
    })?;

    if !metadata.is_file() {
        return Err(HarnessError::TargetNotExecutable(format!(
            "{}: not a regular file",
            display
        )));
    }

    if metadata.len() == 0 {
        return Err(HarnessError::TargetNotExecutable(format!(
            "{}: empty file",
            display
        )));
    }

    let executable = is_executable(&metadata);
    if !executable {
        return Err(HarnessError::TargetNotExecutable(format!(
            "{}: no execute permission",
            display
        )));
    }

    Ok(TargetInfo {
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        executable,
    })
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}
